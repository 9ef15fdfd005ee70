use crate::models::car::{Car, CarFacets, CarFilter};

fn matches_facet(wanted: Option<&str>, value: &str) -> bool {
    match wanted {
        None => true,
        Some(wanted) if wanted.is_empty() => true,
        Some(wanted) => wanted.to_lowercase() == value.to_lowercase(),
    }
}

impl CarFilter {
    pub fn matches(&self, car: &Car) -> bool {
        matches_facet(self.brand.as_deref(), &car.brand) && matches_facet(self.fuel_type.as_deref(), &car.fuel_type)
    }
}

/// Cars shown on the storefront: available ones matching the filter, in fleet order.
pub fn available_cars(cars: Vec<Car>, filter: &CarFilter) -> Vec<Car> {
    cars.into_iter().filter(|car| car.availability && filter.matches(car)).collect()
}

/// Distinct brands and fuel types across the whole fleet, in first-seen order.
pub fn facets(cars: &[Car]) -> CarFacets {
    let mut brands: Vec<String> = Vec::new();
    let mut fuel_types: Vec<String> = Vec::new();

    for car in cars {
        if !brands.contains(&car.brand) {
            brands.push(car.brand.clone());
        }
        if !fuel_types.contains(&car.fuel_type) {
            fuel_types.push(car.fuel_type.clone());
        }
    }

    CarFacets { brands, fuel_types }
}
