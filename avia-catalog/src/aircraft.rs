use avia_core::{AircraftSerial, CoreError, CoreResult, SeatClassMap, ValidationErrors, ValidationResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An airframe and its cabin layout. Shared read-only between flights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aircraft {
    serial: AircraftSerial,
    model: String,
    layout: Arc<SeatClassMap>,
}

impl Aircraft {
    pub fn new(serial: AircraftSerial, model: &str, layout: SeatClassMap) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();
        let model = model.trim();
        if model.is_empty() {
            errors.add("model", "Aircraft model cannot be empty", "EMPTY_MODEL");
        }
        errors.into_result(Self {
            serial,
            model: model.to_string(),
            layout: Arc::new(layout),
        })
    }

    /// Validates serial, model and layout string together.
    pub fn create(serial: &str, model: &str, layout: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();
        let serial = errors.absorb(AircraftSerial::create(serial));
        let layout = errors.absorb(SeatClassMap::create(layout));

        match (serial, layout) {
            (Some(serial), Some(layout)) => Self::new(serial, model, layout),
            _ => {
                if model.trim().is_empty() {
                    errors.add("model", "Aircraft model cannot be empty", "EMPTY_MODEL");
                }
                Err(errors)
            }
        }
    }

    pub fn serial(&self) -> &AircraftSerial {
        &self.serial
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn layout(&self) -> &Arc<SeatClassMap> {
        &self.layout
    }
}

/// Registry of aircraft keyed by serial; flights borrow from it by `Arc`.
#[derive(Debug, Default)]
pub struct Fleet {
    aircraft: BTreeMap<AircraftSerial, Arc<Aircraft>>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, aircraft: Aircraft) -> CoreResult<Arc<Aircraft>> {
        if self.aircraft.contains_key(aircraft.serial()) {
            return Err(CoreError::Duplicate {
                entity: "Aircraft",
                id: aircraft.serial().to_string(),
            });
        }
        let aircraft = Arc::new(aircraft);
        self.aircraft
            .insert(aircraft.serial().clone(), Arc::clone(&aircraft));
        tracing::info!(
            "Registered aircraft {} ({}) with layout {}",
            aircraft.serial(),
            aircraft.model(),
            aircraft.layout()
        );
        Ok(aircraft)
    }

    pub fn get(&self, serial: &str) -> Option<Arc<Aircraft>> {
        let serial = AircraftSerial::create(serial).ok()?;
        self.aircraft.get(&serial).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Aircraft>> {
        self.aircraft.values()
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }
}
