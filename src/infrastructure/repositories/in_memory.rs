use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::invoice::InvoiceStatus;
use crate::domain::repositories::{
    InvoiceRepository, RepositoryError, RepositoryResult, SalesTargetRepository, User,
    UserRepository,
};
use crate::domain::sales_target::{
    DateRange, SalesTarget, SalesTargetWithUser, TargetPeriod, TargetType,
};
use crate::domain::user::value_objects::{Email, UserRole};

/// Invoice as seen by revenue attribution, already joined to its order
#[derive(Debug, Clone)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub sales_id: Uuid,
    pub invoice_date: NaiveDate,
    pub status: InvoiceStatus,
    pub total_amount: Decimal,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    targets: HashMap<Uuid, SalesTarget>,
    invoices: Vec<InvoiceRecord>,
}

/// Process-local store implementing every repository port
///
/// Enforces the same unique and foreign-key rules as the Postgres schema.
/// Used by the test suites and for running the API without a database.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    fail_reads: RwLock<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an invoice attributed to `sales_id`
    pub fn add_invoice(&self, invoice: InvoiceRecord) {
        self.write().invoices.push(invoice);
    }

    /// Makes every subsequent read fail with a database error
    pub fn set_fail_reads(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_reads.write() {
            *flag = fail;
        }
    }

    /// Number of stored targets
    pub fn target_count(&self) -> usize {
        self.read().targets.len()
    }

    fn check_reads(&self) -> RepositoryResult<()> {
        match self.fail_reads.read() {
            Ok(flag) if *flag => Err(RepositoryError::Database("simulated read failure".into())),
            _ => Ok(()),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Tables {
    fn check_constraints(&self, target: &SalesTarget) -> RepositoryResult<()> {
        if !self.users.contains_key(&target.user_id()) {
            return Err(RepositoryError::ForeignKey(format!(
                "user {} does not exist",
                target.user_id()
            )));
        }

        let clash = self.targets.values().any(|t| {
            t.id() != target.id() && t.user_id() == target.user_id() && t.period() == target.period()
        });
        if clash {
            return Err(RepositoryError::Conflict(
                "sales_targets_user_period_key".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> RepositoryResult<Uuid> {
        let mut tables = self.write();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }
        let id = user.id;
        tables.users.insert(id, user);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        self.check_reads()?;
        Ok(self.read().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        self.check_reads()?;
        Ok(self.read().users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_active_by_role(&self, role: UserRole) -> RepositoryResult<Vec<User>> {
        self.check_reads()?;
        let mut users: Vec<User> = self
            .read()
            .users
            .values()
            .filter(|u| u.role == role && u.is_active)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[async_trait]
impl SalesTargetRepository for InMemoryStore {
    async fn insert(&self, target: &SalesTarget) -> RepositoryResult<()> {
        let mut tables = self.write();
        if tables.targets.contains_key(&target.id()) {
            return Err(RepositoryError::Conflict("sales_targets_pkey".to_string()));
        }
        tables.check_constraints(target)?;
        tables.targets.insert(target.id(), target.clone());
        Ok(())
    }

    async fn update(&self, target: &SalesTarget) -> RepositoryResult<()> {
        let mut tables = self.write();
        if !tables.targets.contains_key(&target.id()) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_constraints(target)?;
        tables.targets.insert(target.id(), target.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<SalesTarget>> {
        self.check_reads()?;
        Ok(self.read().targets.get(&id).cloned())
    }

    async fn find_all_with_user(&self) -> RepositoryResult<Vec<SalesTargetWithUser>> {
        self.check_reads()?;
        let tables = self.read();
        let mut rows: Vec<SalesTargetWithUser> = tables
            .targets
            .values()
            .filter_map(|target| {
                tables.users.get(&target.user_id()).map(|user| SalesTargetWithUser {
                    target: target.clone(),
                    user: user.summary(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.target.created_at().cmp(&a.target.created_at()));
        Ok(rows)
    }

    async fn find_by_user_and_period(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
        exclude_id: Option<Uuid>,
    ) -> RepositoryResult<Option<SalesTarget>> {
        self.check_reads()?;
        Ok(self
            .read()
            .targets
            .values()
            .find(|t| {
                t.user_id() == user_id && t.period() == period && Some(t.id()) != exclude_id
            })
            .cloned())
    }

    async fn find_active_by_user_and_period(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
    ) -> RepositoryResult<Option<SalesTarget>> {
        self.check_reads()?;
        Ok(self
            .read()
            .targets
            .values()
            .find(|t| t.is_active() && t.user_id() == user_id && t.period() == period)
            .cloned())
    }

    async fn find_active_by_type(
        &self,
        user_id: Option<Uuid>,
        target_type: TargetType,
    ) -> RepositoryResult<Vec<SalesTarget>> {
        self.check_reads()?;
        let mut targets: Vec<SalesTarget> = self
            .read()
            .targets
            .values()
            .filter(|t| {
                t.is_active()
                    && t.target_type() == target_type
                    && user_id.map_or(true, |id| t.user_id() == id)
            })
            .cloned()
            .collect();
        // Same ordering as the text column in Postgres
        targets.sort_by_key(|t| t.period().to_string());
        Ok(targets)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.write()
            .targets
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
    async fn sum_paid_by_sales(&self, sales_id: Uuid, range: &DateRange) -> RepositoryResult<Decimal> {
        self.check_reads()?;
        Ok(self
            .read()
            .invoices
            .iter()
            .filter(|i| {
                i.status == InvoiceStatus::Paid
                    && i.sales_id == sales_id
                    && range.contains(i.invoice_date)
            })
            .map(|i| i.total_amount)
            .sum())
    }
}
