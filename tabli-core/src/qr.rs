use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const DEFAULT_QR_API: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_SIZE: u32 = 300;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Everything a staff member needs to print a restaurant's check-in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCodeLink {
    pub restaurant_id: u32,
    pub check_in_url: String,
    pub image_url: String,
    pub file_name: String,
}

impl QrCodeLink {
    pub fn new(base_url: &str, qr_api: &str, size: u32, restaurant_id: u32, restaurant_name: &str) -> Self {
        let check_in_url = check_in_url(base_url, restaurant_id);
        Self {
            restaurant_id,
            image_url: qr_image_url(qr_api, size, &check_in_url),
            check_in_url,
            file_name: download_file_name(restaurant_name),
        }
    }
}

pub fn check_in_url(base_url: &str, restaurant_id: u32) -> String {
    format!("{}?qr=true&rid={}", base_url.trim_end_matches('/'), restaurant_id)
}

/// The image itself is rendered by the third-party API; we only build the link.
pub fn qr_image_url(qr_api: &str, size: u32, data: &str) -> String {
    format!("{}?size={}x{}&data={}", qr_api, size, size, urlencoding::encode(data))
}

pub fn download_file_name(restaurant_name: &str) -> String {
    format!("{}_QR_Code.png", WHITESPACE.replace_all(restaurant_name, "_"))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckInError {
    #[error("Not a QR check-in link")]
    NotAScan,
    #[error("Restaurant not found")]
    MissingRestaurant,
    #[error("Restaurant not found: {0:?} is not a restaurant id")]
    MalformedRestaurant(String),
}

/// Query string of a scanned check-in link, `?qr=true&rid=3`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckInParams {
    pub qr: Option<String>,
    pub rid: Option<String>,
}

impl CheckInParams {
    pub fn is_scan(&self) -> bool {
        self.qr.as_deref() == Some("true")
    }

    /// Restaurant id the link points at. Does not check that it exists.
    pub fn restaurant_id(&self) -> Result<u32, CheckInError> {
        if !self.is_scan() {
            return Err(CheckInError::NotAScan);
        }
        let rid = self.rid.as_deref().ok_or(CheckInError::MissingRestaurant)?;
        rid.trim()
            .parse::<u32>()
            .map_err(|_| CheckInError::MalformedRestaurant(rid.to_string()))
    }
}
