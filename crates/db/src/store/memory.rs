use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use carbase_core::pagination::PageRequest;
use carbase_core::types::DbId;
use chrono::Utc;

use super::{identity_conflict, CarStore, StoreError, StoreResult};
use crate::models::car::{Car, CarFilter, CarPage, CreateCar, UpdateCar};

/// In-process [`CarStore`] with the same identity and ordering rules as the
/// Postgres store. Used by tests and by tools that run without a database.
#[derive(Debug, Default)]
pub struct MemoryCarStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: DbId,
    cars: Vec<Car>,
}

type IdentityKey<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str);

fn identity(car: &Car) -> IdentityKey<'_> {
    (
        &car.make_name,
        &car.model_name,
        car.trim_name.as_deref().unwrap_or(""),
        &car.engine_type,
        &car.body_type,
    )
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn matches_filter(car: &Car, filter: &CarFilter) -> bool {
    [
        (&car.make_name, &filter.make),
        (&car.model_name, &filter.model),
        (&car.body_type, &filter.body_type),
    ]
    .into_iter()
    .all(|(value, wanted)| {
        match wanted.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => contains_ci(value, &term.to_lowercase()),
            None => true,
        }
    })
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cars.
    pub fn len(&self) -> usize {
        self.lock().map(|state| state.cars.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Internal("car store lock poisoned".to_string()))
    }

    /// Cars sorted newest first.
    fn newest_first(cars: &[Car]) -> Vec<&Car> {
        let mut sorted: Vec<&Car> = cars.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        sorted
    }
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn create(&self, input: &CreateCar) -> StoreResult<Car> {
        let mut state = self.lock()?;
        let now = Utc::now();
        let car = Car {
            id: state.last_id + 1,
            make_name: input.make_name.clone(),
            model_name: input.model_name.clone(),
            trim_name: input.trim_name.clone(),
            trim_description: input.trim_description.clone(),
            engine_type: input.engine_type.clone(),
            engine_fuel_type: input.engine_fuel_type.clone(),
            engine_drive_type: input.engine_drive_type.clone(),
            engine_cylinders: input.engine_cylinders,
            engine_size: input.engine_size,
            engine_horsepower_hp: input.engine_horsepower_hp,
            engine_horsepower_rpm: input.engine_horsepower_rpm,
            body_type: input.body_type.clone(),
            body_doors: input.body_doors,
            body_seats: input.body_seats,
            created_at: now,
            updated_at: now,
        };
        if state.cars.iter().any(|c| identity(c) == identity(&car)) {
            return Err(identity_conflict());
        }
        state.last_id = car.id;
        state.cars.push(car.clone());
        Ok(car)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Car>> {
        let state = self.lock()?;
        Ok(state.cars.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self, filter: &CarFilter, page: PageRequest) -> StoreResult<CarPage> {
        let state = self.lock()?;
        let matching: Vec<&Car> = Self::newest_first(&state.cars)
            .into_iter()
            .filter(|car| matches_filter(car, filter))
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset().max(0) as usize)
            .take(page.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(CarPage { items, total })
    }

    async fn search(&self, term: &str, limit: i64) -> StoreResult<Vec<Car>> {
        let state = self.lock()?;
        let needle = term.to_lowercase();
        Ok(Self::newest_first(&state.cars)
            .into_iter()
            .filter(|car| {
                contains_ci(&car.make_name, &needle)
                    || contains_ci(&car.model_name, &needle)
                    || car
                        .trim_name
                        .as_deref()
                        .is_some_and(|t| contains_ci(t, &needle))
                    || contains_ci(&car.body_type, &needle)
            })
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: DbId, input: &UpdateCar) -> StoreResult<Option<Car>> {
        let mut state = self.lock()?;
        let Some(index) = state.cars.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        let mut car = state.cars[index].clone();
        macro_rules! apply {
            ($($field:ident),* ; $($opt:ident),*) => {
                $(if let Some(v) = &input.$field { car.$field = v.clone(); })*
                $(if let Some(v) = &input.$opt { car.$opt = v.clone(); })*
            };
        }
        apply!(make_name, model_name, engine_type, body_type;
            trim_name, trim_description, engine_fuel_type, engine_drive_type,
            engine_cylinders, engine_size, engine_horsepower_hp, engine_horsepower_rpm,
            body_doors, body_seats);

        let clash = state
            .cars
            .iter()
            .any(|other| other.id != id && identity(other) == identity(&car));
        if clash {
            return Err(identity_conflict());
        }

        car.updated_at = Utc::now();
        state.cars[index] = car.clone();
        Ok(Some(car))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.lock()?;
        let before = state.cars.len();
        state.cars.retain(|c| c.id != id);
        Ok(state.cars.len() < before)
    }
}
