//! Expense store
//!
//! Shared mutable collection of expenses, budgets and the salary record,
//! behind a repository interface: read-snapshot, append, delete. The
//! analytics engine never touches the store directly; it receives an
//! immutable [`Snapshot`] per invocation.
//!
//! Persistence is a flat JSON file loaded at startup and rewritten atomically
//! (temp file + rename) after every mutation. An in-memory mode skips the
//! file entirely for tests and ephemeral runs. There are no transactional
//! semantics; concurrent-writer consistency is out of scope.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Budget, Expense, NewBudget, NewExpense, Salary, Snapshot};

/// On-disk shape of the store file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    budgets: Vec<Budget>,
    #[serde(default)]
    salary: Salary,
}

/// Expense repository with optional flat-file persistence
pub struct ExpenseStore {
    inner: RwLock<StoreData>,
    path: Option<PathBuf>,
}

impl ExpenseStore {
    /// Create an empty in-memory store (no file backing).
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(StoreData::default()),
            path: None,
        }
    }

    /// Open a file-backed store, loading existing data if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoreData::default()
        };
        info!(
            path = %path.display(),
            expenses = data.expenses.len(),
            budgets = data.budgets.len(),
            "Opened expense store"
        );
        Ok(Self {
            inner: RwLock::new(data),
            path: Some(path),
        })
    }

    /// Default store location under the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| Error::Store("could not determine platform data directory".into()))?;
        Ok(base.join("spendsight").join("store.json"))
    }

    /// Point-in-time copy of everything the analytics engine needs.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let data = self.read()?;
        Ok(Snapshot {
            expenses: data.expenses.clone(),
            budgets: data.budgets.clone(),
            salary: data.salary.clone(),
        })
    }

    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.read()?.expenses.clone())
    }

    /// Validate and append a new expense, persisting the store.
    pub fn add_expense(&self, new: NewExpense) -> Result<Expense> {
        let expense = new.into_expense()?;
        {
            let mut data = self.write()?;
            data.expenses.push(expense.clone());
            self.persist(&data)?;
        }
        debug!(id = %expense.id, amount = expense.amount, "Added expense");
        Ok(expense)
    }

    /// Delete an expense by id. Returns true if something was removed.
    pub fn delete_expense(&self, id: &str) -> Result<bool> {
        let mut data = self.write()?;
        let before = data.expenses.len();
        data.expenses.retain(|e| e.id != id);
        let removed = data.expenses.len() < before;
        if removed {
            self.persist(&data)?;
        }
        Ok(removed)
    }

    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        Ok(self.read()?.budgets.clone())
    }

    /// Validate and append a new budget, replacing any existing budget for
    /// the same category.
    pub fn add_budget(&self, new: NewBudget) -> Result<Budget> {
        let budget = new.into_budget()?;
        {
            let mut data = self.write()?;
            data.budgets.retain(|b| b.category != budget.category);
            data.budgets.push(budget.clone());
            self.persist(&data)?;
        }
        debug!(category = %budget.category, limit = budget.amount, "Configured budget");
        Ok(budget)
    }

    pub fn salary(&self) -> Result<Salary> {
        Ok(self.read()?.salary.clone())
    }

    pub fn set_salary(&self, salary: Salary) -> Result<Salary> {
        if !salary.monthly.is_finite() || salary.monthly < 0.0 {
            return Err(Error::Validation(format!(
                "monthly salary must be a non-negative number, got {}",
                salary.monthly
            )));
        }
        let mut data = self.write()?;
        data.salary = salary.clone();
        self.persist(&data)?;
        Ok(salary)
    }

    /// Seed a handful of demo expenses into an empty store.
    pub fn seed_demo_data(&self) -> Result<usize> {
        let samples = [
            ("Morning Coffee", 120.0, "Food", "Daily coffee from cafe"),
            ("Bus Fare", 50.0, "Transportation", "Public transport"),
            ("Lunch", 200.0, "Food", "Office lunch"),
        ];

        let today = chrono::Local::now().date_naive();
        let mut added = 0;
        {
            let data = self.read()?;
            if !data.expenses.is_empty() {
                return Ok(0);
            }
        }
        for (name, amount, category, description) in samples {
            self.add_expense(NewExpense {
                name: name.to_string(),
                amount,
                date: today.format("%Y-%m-%d").to_string(),
                category: category.to_string(),
                description: description.to_string(),
            })?;
            added += 1;
        }
        Ok(added)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreData>> {
        self.inner
            .read()
            .map_err(|_| Error::Store("store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreData>> {
        self.inner
            .write()
            .map_err(|_| Error::Store("store lock poisoned".into()))
    }

    /// Write the store file atomically: serialize to a temp file in the same
    /// directory, then rename over the target.
    fn persist(&self, data: &StoreData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let parent = path
            .parent()
            .ok_or_else(|| Error::Store(format!("store path {:?} has no parent", path)))?;
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        let json = serde_json::to_string_pretty(data)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path)
            .map_err(|e| Error::Store(format!("failed to replace store file: {}", e)))?;
        Ok(())
    }
}
