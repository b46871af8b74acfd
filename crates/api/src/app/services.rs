//! Startup composition: every collaborator is built here, once.

use std::sync::Arc;

use dancu_events::{ChangeEvent, ChangeNotifier, EventBus, HandlerRegistry, InMemoryEventBus};
use dancu_infra::config::{AppConfig, DispatchMode};
use dancu_infra::fees::{FeePolicy, FeeRecalculationListener, FeeStore, InMemoryFeeStore};
use dancu_infra::repository::{
    ChangeRecordRepository, CitizenRepository, HouseholdRepository, InMemoryChangeRecordRepository,
    InMemoryCitizenRepository, InMemoryHouseholdRepository,
};
use dancu_infra::services::{ChangeRecordService, CitizenService, HouseholdService};
use dancu_infra::worker::spawn_listener_worker;

/// Shared application services, injected into handlers as an `Extension`.
pub struct AppServices {
    pub households: HouseholdService,
    pub citizens: CitizenService,
    pub change_records: ChangeRecordService,
    pub fees: Arc<dyn FeeStore>,
    pub notifier: ChangeNotifier,
    pub dispatch_mode: DispatchMode,
}

pub fn build_services(config: &AppConfig) -> AppServices {
    let households: Arc<dyn HouseholdRepository> = Arc::new(InMemoryHouseholdRepository::new());
    let citizens: Arc<dyn CitizenRepository> = Arc::new(InMemoryCitizenRepository::new());
    let records: Arc<dyn ChangeRecordRepository> = Arc::new(InMemoryChangeRecordRepository::new());
    let fees: Arc<dyn FeeStore> = Arc::new(InMemoryFeeStore::new());

    let listener = FeeRecalculationListener::new(
        households.clone(),
        citizens.clone(),
        fees.clone(),
        FeePolicy::new(config.fee_monthly_rate),
    );

    let notifier = match config.dispatch_mode {
        DispatchMode::Sync => {
            let registry = HandlerRegistry::new();
            registry.register(Arc::new(listener));
            tracing::info!(handlers = ?registry.handler_names(), "synchronous change dispatch");
            ChangeNotifier::new(registry)
        }
        DispatchMode::Async => {
            let bus = InMemoryEventBus::<ChangeEvent>::new();
            // Detached: the worker stops once the bus (owned by the notifier) is dropped.
            let _worker = spawn_listener_worker(bus.subscribe(), listener);
            tracing::info!("asynchronous change dispatch");
            ChangeNotifier::new(bus)
        }
    };

    AppServices {
        households: HouseholdService::new(households.clone(), notifier.clone()),
        citizens: CitizenService::new(citizens, households, notifier.clone()),
        change_records: ChangeRecordService::new(records),
        fees,
        notifier,
        dispatch_mode: config.dispatch_mode,
    }
}
