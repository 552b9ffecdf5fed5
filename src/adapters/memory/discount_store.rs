//! In-memory discount store.
//!
//! Implements both `PlanStore` and `ProductPriceStore` behind a single
//! mutex, which makes the per-plan commits trivially atomic. Used by the
//! test suite and local development runs; production uses the Postgres
//! adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, ProductId, Timestamp};
use crate::domain::plans::{DiscountPlan, ProductDiscount, ProductPricing};
use crate::ports::{PlanStore, ProductPriceStore};

#[derive(Default)]
struct State {
    plans: HashMap<PlanId, DiscountPlan>,
    members: HashMap<PlanId, Vec<ProductId>>,
    products: HashMap<ProductId, ProductPricing>,
}

/// In-memory implementation of the store ports.
///
/// Thread-safe via an internal `Mutex`. Does not persist across restarts.
#[derive(Default)]
pub struct InMemoryDiscountStore {
    inner: Mutex<State>,
}

impl InMemoryDiscountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a product row.
    pub fn insert_product(&self, pricing: ProductPricing) {
        self.inner
            .lock()
            .unwrap()
            .products
            .insert(pricing.product_id, pricing);
    }

    /// Removes a product row, simulating a product deleted out from
    /// under a plan. Test helper.
    pub fn remove_product(&self, product_id: ProductId) {
        self.inner.lock().unwrap().products.remove(&product_id);
    }

    /// Synchronous snapshot of a product's pricing. Test helper.
    pub fn product(&self, product_id: ProductId) -> Option<ProductPricing> {
        self.inner.lock().unwrap().products.get(&product_id).copied()
    }

    /// Synchronous snapshot of a plan. Test helper.
    pub fn plan(&self, plan_id: PlanId) -> Option<DiscountPlan> {
        self.inner.lock().unwrap().plans.get(&plan_id).cloned()
    }

    /// True if every product upholds the discounted-iff-owned invariant.
    pub fn all_pricing_invariants_hold(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .products
            .values()
            .all(ProductPricing::invariant_holds)
    }
}

fn plan_not_found(plan_id: PlanId) -> DomainError {
    DomainError::new(ErrorCode::PlanNotFound, format!("Plan not found: {}", plan_id))
}

#[async_trait]
impl PlanStore for InMemoryDiscountStore {
    async fn insert(&self, plan: &DiscountPlan) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();
        if state.plans.contains_key(&plan.id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Duplicate plan id: {}", plan.id),
            ));
        }
        state.plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PlanId) -> Result<Option<DiscountPlan>, DomainError> {
        Ok(self.inner.lock().unwrap().plans.get(&id).cloned())
    }

    async fn due_for_activation(&self, now: Timestamp) -> Result<Vec<DiscountPlan>, DomainError> {
        let state = self.inner.lock().unwrap();
        let mut due: Vec<_> = state
            .plans
            .values()
            .filter(|p| p.due_for_activation(now))
            .cloned()
            .collect();
        due.sort_by_key(|p| (p.start_date, p.id));
        Ok(due)
    }

    async fn due_for_expiry(&self, now: Timestamp) -> Result<Vec<DiscountPlan>, DomainError> {
        let state = self.inner.lock().unwrap();
        let mut due: Vec<_> = state
            .plans
            .values()
            .filter(|p| p.due_for_expiry(now))
            .cloned()
            .collect();
        due.sort_by_key(|p| (p.end_date, p.id));
        Ok(due)
    }

    async fn member_product_ids(&self, plan_id: PlanId) -> Result<Vec<ProductId>, DomainError> {
        let state = self.inner.lock().unwrap();
        Ok(state.members.get(&plan_id).cloned().unwrap_or_default())
    }

    async fn commit_activation(
        &self,
        plan_id: PlanId,
        discounts: &[ProductDiscount],
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();

        // Validate the transition before touching any product so a
        // failure leaves no partial effects.
        let plan = state
            .plans
            .get_mut(&plan_id)
            .ok_or_else(|| plan_not_found(plan_id))?;
        plan.activate(now).map_err(DomainError::from)?;

        for discount in discounts {
            if let Some(pricing) = state.products.get_mut(&discount.product_id) {
                pricing.discounted_price = Some(discount.discounted_price);
                pricing.plan_id = Some(plan_id);
            }
        }
        Ok(())
    }

    async fn commit_expiry(
        &self,
        plan_id: PlanId,
        members: &[ProductId],
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();

        let plan = state
            .plans
            .get_mut(&plan_id)
            .ok_or_else(|| plan_not_found(plan_id))?;
        plan.expire(now).map_err(DomainError::from)?;

        for product_id in members {
            if let Some(pricing) = state.products.get_mut(product_id) {
                // Ownership check: never clear a discount claimed by
                // another plan.
                if pricing.plan_id == Some(plan_id) {
                    pricing.discounted_price = None;
                    pricing.plan_id = None;
                }
            }
        }
        Ok(())
    }

    async fn attach_product(
        &self,
        plan_id: PlanId,
        product_id: ProductId,
    ) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();
        if !state.plans.contains_key(&plan_id) {
            return Err(plan_not_found(plan_id));
        }
        let members = state.members.entry(plan_id).or_default();
        if !members.contains(&product_id) {
            members.push(product_id);
        }
        Ok(())
    }

    async fn detach_product(
        &self,
        plan_id: PlanId,
        product_id: ProductId,
    ) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(members) = state.members.get_mut(&plan_id) {
            members.retain(|id| *id != product_id);
        }
        Ok(())
    }

    async fn delete(&self, plan_id: PlanId) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();
        if state.plans.remove(&plan_id).is_none() {
            return Err(plan_not_found(plan_id));
        }
        state.members.remove(&plan_id);
        Ok(())
    }
}

#[async_trait]
impl ProductPriceStore for InMemoryDiscountStore {
    async fn price_of(&self, product_id: ProductId) -> Result<Option<i64>, DomainError> {
        let state = self.inner.lock().unwrap();
        Ok(state.products.get(&product_id).map(|p| p.price))
    }

    async fn pricing_of(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ProductPricing>, DomainError> {
        let state = self.inner.lock().unwrap();
        Ok(state.products.get(&product_id).copied())
    }

    async fn set_discount(
        &self,
        product_id: ProductId,
        discounted_price: i64,
        owner: PlanId,
    ) -> Result<(), DomainError> {
        let mut state = self.inner.lock().unwrap();
        let pricing = state.products.get_mut(&product_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ProductNotFound,
                format!("Product not found: {}", product_id),
            )
        })?;
        pricing.discounted_price = Some(discounted_price);
        pricing.plan_id = Some(owner);
        Ok(())
    }

    async fn clear_discount_if_owned_by(
        &self,
        product_id: ProductId,
        plan: PlanId,
    ) -> Result<bool, DomainError> {
        let mut state = self.inner.lock().unwrap();
        match state.products.get_mut(&product_id) {
            Some(pricing) if pricing.plan_id == Some(plan) => {
                pricing.discounted_price = None;
                pricing.plan_id = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
