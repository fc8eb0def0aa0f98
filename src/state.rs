//! The user's record set and the reducer that changes it
//!
//! `FinanceState` is a plain snapshot of every persisted list. It is never
//! edited in place by callers: a `Command` is applied with [`reduce`], which
//! validates it against the snapshot and returns the next snapshot.

use serde::{Deserialize, Serialize};

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    AlertId, BudgetAlert, BudgetId, Category, CategoryBudget, CategoryId, ContributionId,
    EntryId, GoalContribution, GoalId, GoalMilestone, MilestoneId, OneTimeEntry, RecurringEntry,
    SavingsGoal,
};
use crate::services::projection::LedgerItem;

/// Every persisted list, in the on-disk (camelCase) layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinanceState {
    pub categories: Vec<Category>,
    pub recurring_incomes: Vec<RecurringEntry>,
    pub recurring_expenses: Vec<RecurringEntry>,
    pub one_time_incomes: Vec<OneTimeEntry>,
    pub one_time_expenses: Vec<OneTimeEntry>,
    pub category_budgets: Vec<CategoryBudget>,
    pub savings_goals: Vec<SavingsGoal>,
    pub budget_alerts: Vec<BudgetAlert>,
    pub goal_milestones: Vec<GoalMilestone>,
    pub goal_contributions: Vec<GoalContribution>,
}

/// One entity of any persisted kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Category(Category),
    RecurringIncome(RecurringEntry),
    RecurringExpense(RecurringEntry),
    OneTimeIncome(OneTimeEntry),
    OneTimeExpense(OneTimeEntry),
    CategoryBudget(CategoryBudget),
    SavingsGoal(SavingsGoal),
    BudgetAlert(BudgetAlert),
    GoalMilestone(GoalMilestone),
    GoalContribution(GoalContribution),
}

/// The typed id of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Category(CategoryId),
    RecurringIncome(EntryId),
    RecurringExpense(EntryId),
    OneTimeIncome(EntryId),
    OneTimeExpense(EntryId),
    CategoryBudget(BudgetId),
    SavingsGoal(GoalId),
    BudgetAlert(AlertId),
    GoalMilestone(MilestoneId),
    GoalContribution(ContributionId),
}

/// A state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Record),
    Update(Record),
    Delete(RecordKey),
}

impl Record {
    pub fn key(&self) -> RecordKey {
        match self {
            Self::Category(c) => RecordKey::Category(c.id),
            Self::RecurringIncome(e) => RecordKey::RecurringIncome(e.id),
            Self::RecurringExpense(e) => RecordKey::RecurringExpense(e.id),
            Self::OneTimeIncome(e) => RecordKey::OneTimeIncome(e.id),
            Self::OneTimeExpense(e) => RecordKey::OneTimeExpense(e.id),
            Self::CategoryBudget(b) => RecordKey::CategoryBudget(b.id),
            Self::SavingsGoal(g) => RecordKey::SavingsGoal(g.id),
            Self::BudgetAlert(a) => RecordKey::BudgetAlert(a.id),
            Self::GoalMilestone(m) => RecordKey::GoalMilestone(m.id),
            Self::GoalContribution(c) => RecordKey::GoalContribution(c.id),
        }
    }

    /// A human label for logs and messages, when the entity has a name
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Category(c) => Some(c.name.clone()),
            Self::RecurringIncome(e) | Self::RecurringExpense(e) => Some(e.name.clone()),
            Self::OneTimeIncome(e) | Self::OneTimeExpense(e) => Some(e.name.clone()),
            Self::SavingsGoal(g) => Some(g.name.clone()),
            Self::GoalMilestone(m) => Some(m.name.clone()),
            Self::GoalContribution(c) if !c.note.is_empty() => Some(c.note.clone()),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        let result = match self {
            Self::Category(c) => c.validate().map_err(|e| e.to_string()),
            Self::RecurringIncome(e) | Self::RecurringExpense(e) => {
                e.validate().map_err(|e| e.to_string())
            }
            Self::OneTimeIncome(e) | Self::OneTimeExpense(e) => {
                e.validate().map_err(|e| e.to_string())
            }
            Self::CategoryBudget(b) => b.validate().map_err(|e| e.to_string()),
            Self::SavingsGoal(g) => g.validate().map_err(|e| e.to_string()),
            Self::BudgetAlert(a) => a.validate().map_err(|e| e.to_string()),
            Self::GoalMilestone(m) => m.validate().map_err(|e| e.to_string()),
            Self::GoalContribution(c) => c.validate().map_err(|e| e.to_string()),
        };
        result?;

        match self {
            Self::RecurringExpense(RecurringEntry { category_id: None, .. })
            | Self::OneTimeExpense(OneTimeEntry { category_id: None, .. }) => {
                Err("Expenses must have a category".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl RecordKey {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Category(_) => EntityType::Category,
            Self::RecurringIncome(_) => EntityType::RecurringIncome,
            Self::RecurringExpense(_) => EntityType::RecurringExpense,
            Self::OneTimeIncome(_) => EntityType::OneTimeIncome,
            Self::OneTimeExpense(_) => EntityType::OneTimeExpense,
            Self::CategoryBudget(_) => EntityType::CategoryBudget,
            Self::SavingsGoal(_) => EntityType::SavingsGoal,
            Self::BudgetAlert(_) => EntityType::BudgetAlert,
            Self::GoalMilestone(_) => EntityType::GoalMilestone,
            Self::GoalContribution(_) => EntityType::GoalContribution,
        }
    }

    /// The short display form of the id (`cat-1a2b3c4d`)
    pub fn id_string(&self) -> String {
        match self {
            Self::Category(id) => id.to_string(),
            Self::RecurringIncome(id)
            | Self::RecurringExpense(id)
            | Self::OneTimeIncome(id)
            | Self::OneTimeExpense(id) => id.to_string(),
            Self::CategoryBudget(id) => id.to_string(),
            Self::SavingsGoal(id) => id.to_string(),
            Self::BudgetAlert(id) => id.to_string(),
            Self::GoalMilestone(id) => id.to_string(),
            Self::GoalContribution(id) => id.to_string(),
        }
    }

    fn not_found(&self) -> FinanceError {
        FinanceError::NotFound {
            entity_type: self.entity_type().label(),
            identifier: self.id_string(),
        }
    }

    fn duplicate(&self) -> FinanceError {
        FinanceError::Duplicate {
            entity_type: self.entity_type().label(),
            identifier: self.id_string(),
        }
    }
}

/// Apply a command to a snapshot, returning the next snapshot.
///
/// The input is never modified; on error the caller keeps its old state.
pub fn reduce(state: &FinanceState, command: Command) -> FinanceResult<FinanceState> {
    let mut next = state.clone();

    match command {
        Command::Add(record) => {
            let key = record.key();
            record.validate().map_err(FinanceError::Validation)?;
            if next.contains_id(key) {
                return Err(key.duplicate());
            }
            next.check_references(&record)?;
            tracing::debug!(entity = %key.entity_type(), id = %key.id_string(), "adding record");
            next.push(record);
        }
        Command::Update(record) => {
            let key = record.key();
            record.validate().map_err(FinanceError::Validation)?;
            if next.get(key).is_none() {
                return Err(key.not_found());
            }
            next.check_references(&record)?;
            tracing::debug!(entity = %key.entity_type(), id = %key.id_string(), "updating record");
            next.replace(record);
        }
        Command::Delete(key) => {
            if next.get(key).is_none() {
                return Err(key.not_found());
            }
            if let RecordKey::Category(id) = key {
                let references = next.category_references(id);
                if references > 0 {
                    let name = next
                        .category(id)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| id.to_string());
                    return Err(FinanceError::CategoryInUse { name, references });
                }
            }
            tracing::debug!(entity = %key.entity_type(), id = %key.id_string(), "deleting record");
            next.remove(key);
        }
    }

    Ok(next)
}

impl FinanceState {
    /// Whether no list holds anything
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn goal(&self, id: GoalId) -> Option<&SavingsGoal> {
        self.savings_goals.iter().find(|g| g.id == id)
    }

    /// Find a category by short id, full id or case-insensitive name
    pub fn resolve_category(&self, identifier: &str) -> FinanceResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id.matches_short(identifier))
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(identifier.trim()))
            })
            .ok_or_else(|| FinanceError::category_not_found(identifier))
    }

    /// Find a goal by short id, full id or case-insensitive name
    pub fn resolve_goal(&self, identifier: &str) -> FinanceResult<&SavingsGoal> {
        self.savings_goals
            .iter()
            .find(|g| g.id.matches_short(identifier))
            .or_else(|| {
                self.savings_goals
                    .iter()
                    .find(|g| g.name.eq_ignore_ascii_case(identifier.trim()))
            })
            .ok_or_else(|| FinanceError::goal_not_found(identifier))
    }

    /// Find any record whose short id matches, across all lists
    pub fn resolve_key(&self, identifier: &str) -> FinanceResult<RecordKey> {
        self.records()
            .into_iter()
            .map(|r| r.key())
            .find(|key| key_matches(key, identifier))
            .ok_or_else(|| FinanceError::NotFound {
                entity_type: "Record",
                identifier: identifier.to_string(),
            })
    }

    /// Find an income or expense entry by short id or name
    pub fn resolve_entry(&self, identifier: &str) -> FinanceResult<RecordKey> {
        let by_id = self
            .ledger_items_with_keys()
            .find(|(key, _)| key_matches(key, identifier));
        let by_name = || {
            self.ledger_items_with_keys()
                .find(|(_, name)| name.eq_ignore_ascii_case(identifier.trim()))
        };
        by_id
            .or_else(by_name)
            .map(|(key, _)| key)
            .ok_or_else(|| FinanceError::entry_not_found(identifier))
    }

    fn ledger_items_with_keys(&self) -> impl Iterator<Item = (RecordKey, &str)> {
        let recurring_incomes = self
            .recurring_incomes
            .iter()
            .map(|e| (RecordKey::RecurringIncome(e.id), e.name.as_str()));
        let recurring_expenses = self
            .recurring_expenses
            .iter()
            .map(|e| (RecordKey::RecurringExpense(e.id), e.name.as_str()));
        let one_time_incomes = self
            .one_time_incomes
            .iter()
            .map(|e| (RecordKey::OneTimeIncome(e.id), e.name.as_str()));
        let one_time_expenses = self
            .one_time_expenses
            .iter()
            .map(|e| (RecordKey::OneTimeExpense(e.id), e.name.as_str()));
        recurring_incomes
            .chain(recurring_expenses)
            .chain(one_time_incomes)
            .chain(one_time_expenses)
    }

    /// All income items, recurring first
    pub fn incomes(&self) -> Vec<LedgerItem<'_>> {
        self.recurring_incomes
            .iter()
            .map(LedgerItem::from)
            .chain(self.one_time_incomes.iter().map(LedgerItem::from))
            .collect()
    }

    /// All expense items, recurring first
    pub fn expenses(&self) -> Vec<LedgerItem<'_>> {
        self.recurring_expenses
            .iter()
            .map(LedgerItem::from)
            .chain(self.one_time_expenses.iter().map(LedgerItem::from))
            .collect()
    }

    pub fn milestones_for(&self, goal_id: GoalId) -> impl Iterator<Item = &GoalMilestone> {
        self.goal_milestones.iter().filter(move |m| m.goal_id == goal_id)
    }

    pub fn contributions_for(&self, goal_id: GoalId) -> impl Iterator<Item = &GoalContribution> {
        self.goal_contributions
            .iter()
            .filter(move |c| c.goal_id == goal_id)
    }

    /// Number of expenses, budgets and alerts pointing at a category
    pub fn category_references(&self, id: CategoryId) -> usize {
        let recurring = self
            .recurring_expenses
            .iter()
            .filter(|e| e.category_id == Some(id))
            .count();
        let one_time = self
            .one_time_expenses
            .iter()
            .filter(|e| e.category_id == Some(id))
            .count();
        let budgets = self
            .category_budgets
            .iter()
            .filter(|b| b.category_id == id)
            .count();
        let alerts = self
            .budget_alerts
            .iter()
            .filter(|a| a.category_id == id)
            .count();
        recurring + one_time + budgets + alerts
    }

    /// Look up one record by key
    pub fn get(&self, key: RecordKey) -> Option<Record> {
        match key {
            RecordKey::Category(id) => self.category(id).cloned().map(Record::Category),
            RecordKey::RecurringIncome(id) => find(&self.recurring_incomes, |e| e.id == id)
                .map(Record::RecurringIncome),
            RecordKey::RecurringExpense(id) => find(&self.recurring_expenses, |e| e.id == id)
                .map(Record::RecurringExpense),
            RecordKey::OneTimeIncome(id) => {
                find(&self.one_time_incomes, |e| e.id == id).map(Record::OneTimeIncome)
            }
            RecordKey::OneTimeExpense(id) => {
                find(&self.one_time_expenses, |e| e.id == id).map(Record::OneTimeExpense)
            }
            RecordKey::CategoryBudget(id) => {
                find(&self.category_budgets, |b| b.id == id).map(Record::CategoryBudget)
            }
            RecordKey::SavingsGoal(id) => self.goal(id).cloned().map(Record::SavingsGoal),
            RecordKey::BudgetAlert(id) => {
                find(&self.budget_alerts, |a| a.id == id).map(Record::BudgetAlert)
            }
            RecordKey::GoalMilestone(id) => {
                find(&self.goal_milestones, |m| m.id == id).map(Record::GoalMilestone)
            }
            RecordKey::GoalContribution(id) => {
                find(&self.goal_contributions, |c| c.id == id).map(Record::GoalContribution)
            }
        }
    }

    /// Every record, list by list
    pub fn records(&self) -> Vec<Record> {
        let mut records = Vec::new();
        records.extend(self.categories.iter().cloned().map(Record::Category));
        records.extend(self.recurring_incomes.iter().cloned().map(Record::RecurringIncome));
        records.extend(self.recurring_expenses.iter().cloned().map(Record::RecurringExpense));
        records.extend(self.one_time_incomes.iter().cloned().map(Record::OneTimeIncome));
        records.extend(self.one_time_expenses.iter().cloned().map(Record::OneTimeExpense));
        records.extend(self.category_budgets.iter().cloned().map(Record::CategoryBudget));
        records.extend(self.savings_goals.iter().cloned().map(Record::SavingsGoal));
        records.extend(self.budget_alerts.iter().cloned().map(Record::BudgetAlert));
        records.extend(self.goal_milestones.iter().cloned().map(Record::GoalMilestone));
        records.extend(self.goal_contributions.iter().cloned().map(Record::GoalContribution));
        records
    }

    /// Entry ids are shared by the four entry lists, so a duplicate in any
    /// of them counts
    fn contains_id(&self, key: RecordKey) -> bool {
        match key {
            RecordKey::RecurringIncome(id)
            | RecordKey::RecurringExpense(id)
            | RecordKey::OneTimeIncome(id)
            | RecordKey::OneTimeExpense(id) => [
                RecordKey::RecurringIncome(id),
                RecordKey::RecurringExpense(id),
                RecordKey::OneTimeIncome(id),
                RecordKey::OneTimeExpense(id),
            ]
            .into_iter()
            .any(|k| self.get(k).is_some()),
            other => self.get(other).is_some(),
        }
    }

    fn check_references(&self, record: &Record) -> FinanceResult<()> {
        let category_ref = match record {
            Record::RecurringExpense(e) | Record::RecurringIncome(e) => e.category_id,
            Record::OneTimeExpense(e) | Record::OneTimeIncome(e) => e.category_id,
            Record::CategoryBudget(b) => Some(b.category_id),
            Record::BudgetAlert(a) => Some(a.category_id),
            _ => None,
        };
        if let Some(id) = category_ref {
            if self.category(id).is_none() {
                return Err(FinanceError::category_not_found(id.to_string()));
            }
        }

        let goal_ref = match record {
            Record::GoalMilestone(m) => Some(m.goal_id),
            Record::GoalContribution(c) => Some(c.goal_id),
            _ => None,
        };
        if let Some(id) = goal_ref {
            if self.goal(id).is_none() {
                return Err(FinanceError::goal_not_found(id.to_string()));
            }
        }

        if let Record::Category(category) = record {
            let clash = self.categories.iter().any(|c| {
                c.id != category.id && c.name.eq_ignore_ascii_case(category.name.trim())
            });
            if clash {
                return Err(FinanceError::Duplicate {
                    entity_type: "Category",
                    identifier: category.name.clone(),
                });
            }
        }

        Ok(())
    }

    fn push(&mut self, record: Record) {
        match record {
            Record::Category(c) => self.categories.push(c),
            Record::RecurringIncome(e) => self.recurring_incomes.push(e),
            Record::RecurringExpense(e) => self.recurring_expenses.push(e),
            Record::OneTimeIncome(e) => self.one_time_incomes.push(e),
            Record::OneTimeExpense(e) => self.one_time_expenses.push(e),
            Record::CategoryBudget(b) => self.category_budgets.push(b),
            Record::SavingsGoal(g) => self.savings_goals.push(g),
            Record::BudgetAlert(a) => self.budget_alerts.push(a),
            Record::GoalMilestone(m) => self.goal_milestones.push(m),
            Record::GoalContribution(c) => self.goal_contributions.push(c),
        }
    }

    fn replace(&mut self, record: Record) {
        match record {
            Record::Category(c) => replace_where(&mut self.categories, c, |a, b| a.id == b.id),
            Record::RecurringIncome(e) => {
                replace_where(&mut self.recurring_incomes, e, |a, b| a.id == b.id)
            }
            Record::RecurringExpense(e) => {
                replace_where(&mut self.recurring_expenses, e, |a, b| a.id == b.id)
            }
            Record::OneTimeIncome(e) => {
                replace_where(&mut self.one_time_incomes, e, |a, b| a.id == b.id)
            }
            Record::OneTimeExpense(e) => {
                replace_where(&mut self.one_time_expenses, e, |a, b| a.id == b.id)
            }
            Record::CategoryBudget(b) => {
                replace_where(&mut self.category_budgets, b, |x, y| x.id == y.id)
            }
            Record::SavingsGoal(g) => replace_where(&mut self.savings_goals, g, |a, b| a.id == b.id),
            Record::BudgetAlert(a) => replace_where(&mut self.budget_alerts, a, |x, y| x.id == y.id),
            Record::GoalMilestone(m) => {
                replace_where(&mut self.goal_milestones, m, |a, b| a.id == b.id)
            }
            Record::GoalContribution(c) => {
                replace_where(&mut self.goal_contributions, c, |a, b| a.id == b.id)
            }
        }
    }

    fn remove(&mut self, key: RecordKey) {
        match key {
            RecordKey::Category(id) => self.categories.retain(|c| c.id != id),
            RecordKey::RecurringIncome(id) => self.recurring_incomes.retain(|e| e.id != id),
            RecordKey::RecurringExpense(id) => self.recurring_expenses.retain(|e| e.id != id),
            RecordKey::OneTimeIncome(id) => self.one_time_incomes.retain(|e| e.id != id),
            RecordKey::OneTimeExpense(id) => self.one_time_expenses.retain(|e| e.id != id),
            RecordKey::CategoryBudget(id) => self.category_budgets.retain(|b| b.id != id),
            RecordKey::SavingsGoal(id) => {
                self.savings_goals.retain(|g| g.id != id);
                self.goal_milestones.retain(|m| m.goal_id != id);
                self.goal_contributions.retain(|c| c.goal_id != id);
            }
            RecordKey::BudgetAlert(id) => self.budget_alerts.retain(|a| a.id != id),
            RecordKey::GoalMilestone(id) => self.goal_milestones.retain(|m| m.id != id),
            RecordKey::GoalContribution(id) => self.goal_contributions.retain(|c| c.id != id),
        }
    }
}

fn find<T: Clone>(list: &[T], pred: impl Fn(&T) -> bool) -> Option<T> {
    list.iter().find(|item| pred(item)).cloned()
}

fn replace_where<T>(list: &mut [T], item: T, same: impl Fn(&T, &T) -> bool) {
    if let Some(slot) = list.iter_mut().find(|existing| same(existing, &item)) {
        *slot = item;
    }
}

fn key_matches(key: &RecordKey, identifier: &str) -> bool {
    match key {
        RecordKey::Category(id) => id.matches_short(identifier),
        RecordKey::RecurringIncome(id)
        | RecordKey::RecurringExpense(id)
        | RecordKey::OneTimeIncome(id)
        | RecordKey::OneTimeExpense(id) => id.matches_short(identifier),
        RecordKey::CategoryBudget(id) => id.matches_short(identifier),
        RecordKey::SavingsGoal(id) => id.matches_short(identifier),
        RecordKey::BudgetAlert(id) => id.matches_short(identifier),
        RecordKey::GoalMilestone(id) => id.matches_short(identifier),
        RecordKey::GoalContribution(id) => id.matches_short(identifier),
    }
}
