use std::collections::BTreeMap;

use tabli_core::restaurant::RestaurantSummary;
use tabli_floor::Restaurant;
use tokio::sync::RwLock;

use crate::events::EventBus;
use crate::StoreError;

/// Every restaurant, keyed by id.
///
/// Mutations run synchronously under the write lock. Floor events the
/// aggregate recorded are published before the lock is released, so
/// subscribers see them in mutation order.
pub struct RestaurantDirectory {
    restaurants: RwLock<BTreeMap<u32, Restaurant>>,
    events: EventBus,
}

impl RestaurantDirectory {
    pub fn new(restaurants: impl IntoIterator<Item = Restaurant>, events: EventBus) -> Self {
        let restaurants = restaurants.into_iter().map(|r| (r.id(), r)).collect();
        Self {
            restaurants: RwLock::new(restaurants),
            events,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub async fn summaries(&self) -> Vec<RestaurantSummary> {
        self.restaurants.read().await.values().map(Restaurant::summary).collect()
    }

    pub async fn ids(&self) -> Vec<u32> {
        self.restaurants.read().await.keys().copied().collect()
    }

    pub async fn contains(&self, id: u32) -> bool {
        self.restaurants.read().await.contains_key(&id)
    }

    pub async fn read<R>(&self, id: u32, f: impl FnOnce(&Restaurant) -> R) -> Result<R, StoreError> {
        let restaurants = self.restaurants.read().await;
        let restaurant = restaurants.get(&id).ok_or(StoreError::RestaurantNotFound(id))?;
        Ok(f(restaurant))
    }

    pub async fn update<R>(&self, id: u32, f: impl FnOnce(&mut Restaurant) -> R) -> Result<R, StoreError> {
        let mut restaurants = self.restaurants.write().await;
        let restaurant = restaurants.get_mut(&id).ok_or(StoreError::RestaurantNotFound(id))?;
        let result = f(restaurant);
        self.publish(restaurant);
        Ok(result)
    }

    /// Run `f` against every restaurant under one write lock.
    pub async fn update_all<R>(&self, mut f: impl FnMut(&mut Restaurant) -> R) -> Vec<(u32, R)> {
        let mut restaurants = self.restaurants.write().await;
        restaurants
            .iter_mut()
            .map(|(id, restaurant)| {
                let result = f(restaurant);
                self.publish(restaurant);
                (*id, result)
            })
            .collect()
    }

    /// Insert a new restaurant under the next free id (highest + 1).
    /// Nothing is inserted when `build` fails.
    pub async fn create<E>(&self, build: impl FnOnce(u32) -> Result<Restaurant, E>) -> Result<u32, E> {
        let mut restaurants = self.restaurants.write().await;
        let id = restaurants.keys().next_back().map_or(1, |max| max + 1);
        let mut restaurant = build(id)?;
        restaurant.profile.id = id;
        self.publish(&mut restaurant);
        restaurants.insert(id, restaurant);
        Ok(id)
    }

    pub async fn remove(&self, id: u32) -> Result<Restaurant, StoreError> {
        self.restaurants
            .write()
            .await
            .remove(&id)
            .ok_or(StoreError::RestaurantNotFound(id))
    }

    fn publish(&self, restaurant: &mut Restaurant) {
        for event in restaurant.take_events() {
            self.events.publish(event);
        }
    }
}
