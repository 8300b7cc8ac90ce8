//! Order creation, the only user-facing entry point.

use std::sync::Arc;

use common::OrderId;
use domain::Order;
use metrics::counter;
use store::{OrderRepository, UnitOfWork};

use super::to_integration;
use crate::error::ApplicationError;
use crate::services::geo::GeoClient;
use crate::services::location::{RandomLocationProvider, RandomSource};

/// Request to create a new order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub order_id: OrderId,
    pub volume: u32,
    /// Free-text delivery address. Resolved through the geo client when one
    /// is configured; otherwise the order gets a random grid location.
    pub address: Option<String>,
}

impl CreateOrderCommand {
    pub fn new(order_id: OrderId, volume: u32) -> Self {
        Self {
            order_id,
            volume,
            address: None,
        }
    }

    pub fn with_address(order_id: OrderId, volume: u32, address: impl Into<String>) -> Self {
        Self {
            order_id,
            volume,
            address: Some(address.into()),
        }
    }
}

/// Creates orders and commits their creation events through the outbox.
///
/// Validation failures and rule violations (including a duplicate order id)
/// surface directly to the caller, unlike tick failures which are only
/// logged.
pub struct CreateOrderHandler<O, U, R>
where
    O: OrderRepository,
    U: UnitOfWork,
    R: RandomSource,
{
    orders: O,
    uow: U,
    locations: RandomLocationProvider<R>,
    geo: Option<Arc<dyn GeoClient>>,
}

impl<O, U, R> CreateOrderHandler<O, U, R>
where
    O: OrderRepository,
    U: UnitOfWork,
    R: RandomSource,
{
    pub fn new(orders: O, uow: U, locations: RandomLocationProvider<R>) -> Self {
        Self {
            orders,
            uow,
            locations,
            geo: None,
        }
    }

    /// Configures a geo client for address-carrying commands.
    pub fn with_geo(mut self, geo: Arc<dyn GeoClient>) -> Self {
        self.geo = Some(geo);
        self
    }

    #[tracing::instrument(skip(self), fields(order_id = %command.order_id))]
    pub async fn handle(&self, command: CreateOrderCommand) -> Result<(), ApplicationError> {
        let location = match (&command.address, &self.geo) {
            (Some(address), Some(geo)) => geo.get_location(address).await?,
            _ => self.locations.next_location(),
        };

        if self.orders.get(command.order_id).await?.is_some() {
            return Err(ApplicationError::OrderAlreadyExists {
                order_id: command.order_id,
            });
        }

        let mut order = Order::create(command.order_id, location, command.volume)?;
        let events = to_integration(order.take_events())?;

        self.orders.add(order).await?;
        self.uow.save_changes(events).await?;

        counter!("orders_created_total").increment(1);
        tracing::info!(%location, "order created");
        Ok(())
    }
}
