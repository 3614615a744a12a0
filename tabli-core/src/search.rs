use serde::{Deserialize, Serialize};

use crate::restaurant::{City, RestaurantSummary};

/// Directory filter: free text over name, cuisine, location and city, plus
/// optional exact cuisine and city filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantQuery {
    pub q: Option<String>,
    pub cuisine: Option<String>,
    pub city: Option<City>,
}

impl RestaurantQuery {
    pub fn matches(&self, restaurant: &RestaurantSummary) -> bool {
        let needle = self.q.as_deref().unwrap_or("").to_lowercase();
        let matches_text = needle.is_empty()
            || [
                restaurant.name.as_str(),
                restaurant.cuisine.as_str(),
                restaurant.location.as_str(),
                restaurant.city.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

        let matches_cuisine = self.cuisine.as_deref().map_or(true, |c| restaurant.cuisine == c);
        let matches_city = self.city.map_or(true, |c| restaurant.city == c);

        matches_text && matches_cuisine && matches_city
    }

    pub fn apply(&self, restaurants: Vec<RestaurantSummary>) -> Vec<RestaurantSummary> {
        restaurants.into_iter().filter(|r| self.matches(r)).collect()
    }
}

pub const TRENDING_MIN_WEEKLY_CUSTOMERS: u32 = 50;
pub const POPULAR_MIN_WAITING: u32 = 5;
pub const TOP_RATED_MIN_RATING: f32 = 4.7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverSections {
    pub trending: Vec<RestaurantSummary>,
    pub popular: Vec<RestaurantSummary>,
    pub top_rated: Vec<RestaurantSummary>,
}

pub fn discover(restaurants: &[RestaurantSummary]) -> DiscoverSections {
    let mut trending: Vec<_> = restaurants
        .iter()
        .filter(|r| r.weekly_average_customers > TRENDING_MIN_WEEKLY_CUSTOMERS)
        .cloned()
        .collect();
    trending.sort_by(|a, b| b.weekly_average_customers.cmp(&a.weekly_average_customers));

    let mut popular: Vec<_> = restaurants
        .iter()
        .filter(|r| r.waiting_in_line > POPULAR_MIN_WAITING)
        .cloned()
        .collect();
    popular.sort_by(|a, b| b.waiting_in_line.cmp(&a.waiting_in_line));

    let mut top_rated: Vec<_> = restaurants
        .iter()
        .filter(|r| r.rating >= TOP_RATED_MIN_RATING)
        .cloned()
        .collect();
    top_rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    DiscoverSections { trending, popular, top_rated }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::RestaurantStatus;

    fn summary(id: u32, name: &str, city: City, cuisine: &str, rating: f32, weekly: u32, waiting: u32) -> RestaurantSummary {
        RestaurantSummary {
            id,
            name: name.to_string(),
            city,
            cuisine: cuisine.to_string(),
            location: "Somewhere, 1 mile".to_string(),
            rating,
            image: String::new(),
            price_range: "$$".to_string(),
            status: RestaurantStatus::Available,
            tables_available: 1,
            waiting_in_line: waiting,
            weekly_average_customers: weekly,
            estimated_wait: None,
        }
    }

    fn sample() -> Vec<RestaurantSummary> {
        vec![
            summary(1, "Bella Vista Italian", City::Dubai, "Italian", 4.8, 68, 2),
            summary(2, "Sakura Sushi", City::Dubai, "Asian", 4.6, 45, 8),
            summary(4, "Tony's Pizza Corner", City::AbuDhabi, "Pizza", 4.7, 78, 12),
            summary(9, "Desert Pizza Co.", City::AlAin, "Pizza", 4.5, 51, 7),
        ]
    }

    #[test]
    fn test_text_search_is_case_insensitive() {
        let query = RestaurantQuery { q: Some("PIZZA".to_string()), ..Default::default() };
        let ids: Vec<u32> = query.apply(sample()).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 9]);

        let query = RestaurantQuery { q: Some("abu".to_string()), ..Default::default() };
        assert_eq!(query.apply(sample()).len(), 1);
    }

    #[test]
    fn test_filters_combine() {
        let query = RestaurantQuery {
            q: None,
            cuisine: Some("Pizza".to_string()),
            city: Some(City::AlAin),
        };
        let result = query.apply(sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Desert Pizza Co.");
    }

    #[test]
    fn test_discover_sections() {
        let sections = discover(&sample());
        let ids = |list: &[RestaurantSummary]| list.iter().map(|r| r.id).collect::<Vec<_>>();

        assert_eq!(ids(&sections.trending), vec![4, 1, 9]);
        assert_eq!(ids(&sections.popular), vec![4, 2, 9]);
        assert_eq!(ids(&sections.top_rated), vec![1, 4]);
    }
}
