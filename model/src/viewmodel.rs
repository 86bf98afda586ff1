use crate::{Car, CarID, GeofenceSet, MapEvent, MapEventSender, SelectionEvent};

/// The upstream side of the map: the properties the reconciler observes, and the two it writes
/// back through selection events. Every setter publishes onto the render queue.
pub struct MapViewModel {
    cars: Vec<Car>,
    geofences: Option<GeofenceSet>,
    detail_sheet_open: bool,
    selected_car: Option<CarID>,
    // Loyalty points, already formatted by the backend. The map itself doesn't care.
    bonus_balance: Option<String>,

    events: MapEventSender,
}

impl MapViewModel {
    pub fn new(events: MapEventSender) -> Self {
        Self {
            cars: Vec::new(),
            geofences: None,
            detail_sheet_open: false,
            selected_car: None,
            bonus_balance: None,
            events,
        }
    }

    pub fn set_cars(&mut self, cars: Vec<Car>) {
        self.cars = cars;
        self.events.send(MapEvent::CarsChanged(self.cars.clone()));
    }

    pub fn set_geofences(&mut self, geofences: Option<GeofenceSet>) {
        self.geofences = geofences;
        self.events
            .send(MapEvent::GeofencesChanged(self.geofences.clone()));
    }

    pub fn go_to_user(&self) {
        self.events.send(MapEvent::RecenterTriggered);
    }

    pub fn is_detail_sheet_open(&self) -> bool {
        self.detail_sheet_open
    }

    pub fn set_detail_sheet_open(&mut self, open: bool) {
        self.detail_sheet_open = open;
        self.events.send(MapEvent::DetailSheetChanged(open));
    }

    pub fn close_detail_sheet(&mut self) {
        self.set_detail_sheet_open(false);
    }

    pub fn selected_car(&self) -> Option<&CarID> {
        self.selected_car.as_ref()
    }

    pub fn bonus_balance(&self) -> Option<&str> {
        self.bonus_balance.as_deref()
    }

    pub fn set_bonus_balance(&mut self, balance: Option<String>) {
        self.bonus_balance = balance;
    }

    /// The selected car from the latest snapshot. None if it's since disappeared.
    pub fn current_car(&self) -> Option<&Car> {
        let id = self.selected_car.as_ref()?;
        self.cars.iter().find(|car| &car.id == id)
    }

    /// What happens after a pin is tapped: the car becomes current and its details open.
    pub fn handle_selection(&mut self, event: SelectionEvent) -> Option<&Car> {
        self.selected_car = Some(event.car);
        self.set_detail_sheet_open(true);
        self.current_car()
    }
}
