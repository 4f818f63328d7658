//! Condition-set schema and the manager that mutates a resource's conditions.
//!
//! A [`ConditionSet`] is the per-kind schema: the fixed, ordered list of
//! dependent condition types whose conjunction determines the single derived
//! "happy" condition (conventionally `Ready`). A [`ConditionManager`] binds
//! that schema to one resource's live condition list and recomputes the happy
//! condition after every mutation.
//!
//! The schema is immutable after construction and safe to share across
//! resources. The manager borrows one resource's status mutably, so the
//! single-writer-per-resource discipline is enforced by the borrow checker.

use super::condition::{Condition, ConditionSeverity, ConditionStatus};
use super::SourceStatus;

/// One dependent condition type declared in a [`ConditionSet`], with the
/// severity that governs whether its failure blocks readiness.
#[derive(Clone, Debug)]
pub struct DependentCondition {
    condition_type: String,
    severity: ConditionSeverity,
}

impl DependentCondition {
    /// Declare a blocking (`Error`-severity) dependent.
    pub fn new(condition_type: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            severity: ConditionSeverity::Error,
        }
    }

    /// Declare an advisory (`Warning`-severity) dependent. Its failure is
    /// recorded but does not block the happy condition.
    pub fn warning(condition_type: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            severity: ConditionSeverity::Warning,
        }
    }

    /// The condition type name.
    pub fn condition_type(&self) -> &str {
        &self.condition_type
    }

    /// The declared severity.
    pub fn severity(&self) -> ConditionSeverity {
        self.severity
    }
}

/// Immutable per-kind schema: the happy condition type plus the ordered set
/// of dependent condition types.
///
/// Declaration order is significant: when several dependents fail at once,
/// the happy condition copies reason and message from the *earliest declared*
/// failing dependent, regardless of mutation order.
#[derive(Clone, Debug)]
pub struct ConditionSet {
    happy_type: String,
    dependents: Vec<DependentCondition>,
}

impl ConditionSet {
    /// Construct a schema from a happy condition type and its dependents.
    ///
    /// # Panics
    ///
    /// Panics if the happy type appears among the dependents or if a
    /// dependent type is declared twice. Both are programming errors in kind
    /// registration and must fail at process start.
    pub fn new(happy_type: &str, dependents: impl IntoIterator<Item = DependentCondition>) -> Self {
        let dependents: Vec<DependentCondition> = dependents.into_iter().collect();
        for (i, dep) in dependents.iter().enumerate() {
            assert!(
                dep.condition_type != happy_type,
                "happy condition type {happy_type:?} must not be declared as a dependent"
            );
            assert!(
                !dependents[..i]
                    .iter()
                    .any(|d| d.condition_type == dep.condition_type),
                "duplicate dependent condition type {:?}",
                dep.condition_type
            );
        }
        Self {
            happy_type: happy_type.to_string(),
            dependents,
        }
    }

    /// The type name of the derived happy condition.
    pub fn happy_type(&self) -> &str {
        &self.happy_type
    }

    /// The declared dependents, in declaration order.
    pub fn dependents(&self) -> &[DependentCondition] {
        &self.dependents
    }

    /// Bind this schema to one resource's live condition list.
    ///
    /// Side-effect free; may be called repeatedly for the same resource.
    pub fn manage<'a>(&'a self, status: &'a mut SourceStatus) -> ConditionManager<'a> {
        ConditionManager {
            set: self,
            conditions: &mut status.conditions,
        }
    }

    /// Severity with which the given condition type is tracked: `Error` for
    /// the happy condition, the declared severity for dependents, `Info` for
    /// anything outside the schema.
    fn severity_of(&self, condition_type: &str) -> ConditionSeverity {
        if condition_type == self.happy_type {
            return ConditionSeverity::Error;
        }
        self.dependents
            .iter()
            .find(|d| d.condition_type == condition_type)
            .map(|d| d.severity)
            .unwrap_or(ConditionSeverity::Info)
    }

    fn is_dependent(&self, condition_type: &str) -> bool {
        self.dependents
            .iter()
            .any(|d| d.condition_type == condition_type)
    }
}

/// Runtime handle bound to one resource's condition list.
///
/// All mutations are idempotent: re-marking a condition with its current
/// status, reason, and message changes nothing, and in particular does not
/// touch `lastTransitionTime`.
pub struct ConditionManager<'a> {
    set: &'a ConditionSet,
    conditions: &'a mut Vec<Condition>,
}

impl ConditionManager<'_> {
    /// Materialize every dependent plus the happy condition as `Unknown`,
    /// leaving any condition that already exists untouched.
    pub fn initialize_conditions(&mut self) {
        let set = self.set;
        for dep in set.dependents() {
            if self.get_condition(dep.condition_type()).is_none() {
                self.set_condition(Condition::unknown(dep.condition_type(), dep.severity()));
            }
        }
        if self.get_condition(self.set.happy_type()).is_none() {
            let happy = Condition::unknown(self.set.happy_type(), ConditionSeverity::Error);
            self.set_condition(happy);
        }
    }

    /// Set the named condition to `True`, clearing reason and message.
    ///
    /// Returns whether the stored condition changed.
    pub fn mark_true(&mut self, condition_type: &str) -> bool {
        self.mark(condition_type, ConditionStatus::True, "", "")
    }

    /// Set the named condition to `True` while retaining an informational
    /// reason and message ("true but noteworthy").
    pub fn mark_true_with_reason(
        &mut self,
        condition_type: &str,
        reason: &str,
        message: &str,
    ) -> bool {
        self.mark(condition_type, ConditionStatus::True, reason, message)
    }

    /// Set the named condition to `False` with the given reason and message.
    pub fn mark_false(&mut self, condition_type: &str, reason: &str, message: &str) -> bool {
        self.mark(condition_type, ConditionStatus::False, reason, message)
    }

    /// Set the named condition to `Unknown` with the given reason and message.
    pub fn mark_unknown(&mut self, condition_type: &str, reason: &str, message: &str) -> bool {
        self.mark(condition_type, ConditionStatus::Unknown, reason, message)
    }

    /// Whether the happy condition is currently `True`.
    pub fn is_happy(&self) -> bool {
        self.get_condition(self.set.happy_type())
            .is_some_and(Condition::is_true)
    }

    /// Look up a condition by type. Returns `None` if no condition of that
    /// type exists, including types outside the schema.
    pub fn get_condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.r#type == condition_type)
    }

    fn mark(
        &mut self,
        condition_type: &str,
        status: ConditionStatus,
        reason: &str,
        message: &str,
    ) -> bool {
        let severity = self.set.severity_of(condition_type);
        let changed = self.set_condition(Condition::new(
            condition_type,
            status,
            severity,
            reason,
            message,
        ));
        if self.set.is_dependent(condition_type) {
            self.recompute_happy();
        }
        changed
    }

    /// Store a condition, preserving `lastTransitionTime` unless the status
    /// value actually changed. Returns whether anything was stored.
    fn set_condition(&mut self, mut condition: Condition) -> bool {
        if let Some(existing) = self
            .conditions
            .iter_mut()
            .find(|c| c.r#type == condition.r#type)
        {
            if existing.same_state(&condition) {
                return false;
            }
            if existing.status == condition.status {
                condition.last_transition_time = existing.last_transition_time.clone();
            }
            *existing = condition;
            return true;
        }
        self.conditions.push(condition);
        self.conditions.sort_by(|a, b| a.r#type.cmp(&b.r#type));
        true
    }

    /// Recompute the happy condition from the dependents, in declaration
    /// order. Only `Error`-severity dependents are consulted: a `False` one
    /// blocks readiness and dominates `Unknown`. `Warning` and `Info`
    /// dependents are advisory and never affect the outcome.
    fn recompute_happy(&mut self) {
        let set = self.set;
        for dep in set.dependents() {
            if self.get_condition(dep.condition_type()).is_none() {
                self.set_condition(Condition::unknown(dep.condition_type(), dep.severity()));
            }
        }

        let mut happy = Condition::new(
            set.happy_type(),
            ConditionStatus::True,
            ConditionSeverity::Error,
            "",
            "",
        );
        for dep in set.dependents() {
            let condition = self
                .get_condition(dep.condition_type())
                .expect("dependent conditions were materialized above");
            if condition.is_false() && dep.severity() == ConditionSeverity::Error {
                happy.status = ConditionStatus::False;
                happy.reason = condition.reason.clone();
                happy.message = condition.message.clone();
                break;
            }
        }
        if happy.is_true() {
            for dep in set.dependents() {
                if dep.severity() != ConditionSeverity::Error {
                    continue;
                }
                let condition = self
                    .get_condition(dep.condition_type())
                    .expect("dependent conditions were materialized above");
                if condition.is_unknown() {
                    happy.status = ConditionStatus::Unknown;
                    happy.reason = condition.reason.clone();
                    happy.message = condition.message.clone();
                    break;
                }
            }
        }
        self.set_condition(happy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: &str = "Ready";
    const SINK: &str = "SinkResolved";
    const SUBSCRIBED: &str = "Subscribed";
    const HEALTHY: &str = "AdapterHealthy";

    fn two_dependent_set() -> ConditionSet {
        ConditionSet::new(
            READY,
            [
                DependentCondition::new(SINK),
                DependentCondition::new(SUBSCRIBED),
            ],
        )
    }

    #[test]
    #[should_panic(expected = "must not be declared as a dependent")]
    fn test_happy_type_among_dependents_panics() {
        ConditionSet::new(READY, [DependentCondition::new(READY)]);
    }

    #[test]
    #[should_panic(expected = "duplicate dependent condition type")]
    fn test_duplicate_dependent_panics() {
        ConditionSet::new(
            READY,
            [
                DependentCondition::new(SINK),
                DependentCondition::new(SINK),
            ],
        );
    }

    #[test]
    fn test_initialize_conditions_all_unknown() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.initialize_conditions();

        for condition_type in [READY, SINK, SUBSCRIBED] {
            let condition = manager
                .get_condition(condition_type)
                .expect("condition should be materialized");
            assert!(condition.is_unknown(), "{condition_type} should be Unknown");
        }
        assert!(!manager.is_happy());
    }

    #[test]
    fn test_all_dependents_true_is_happy() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_true(SINK);
        manager.mark_true(SUBSCRIBED);

        assert!(manager.is_happy());
        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert!(ready.reason.is_empty());
        assert!(ready.message.is_empty());
    }

    #[test]
    fn test_single_false_error_dependent_blocks() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_true(SINK);
        manager.mark_false(SUBSCRIBED, "AuthFailed", "bad credentials");

        assert!(!manager.is_happy());
        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert!(ready.is_false());
        assert_eq!(ready.reason, "AuthFailed");
        assert_eq!(ready.message, "bad credentials");
    }

    #[test]
    fn test_earliest_declared_false_wins() {
        let set = two_dependent_set();

        // Mark in reverse declaration order; the happy condition must still
        // copy from SinkResolved, declared first.
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_false(SUBSCRIBED, "SecondReason", "second");
        manager.mark_false(SINK, "FirstReason", "first");

        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert_eq!(ready.reason, "FirstReason");

        // And in declaration order.
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_false(SINK, "FirstReason", "first");
        manager.mark_false(SUBSCRIBED, "SecondReason", "second");

        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert_eq!(ready.reason, "FirstReason");
    }

    #[test]
    fn test_false_dominates_unknown() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_unknown(SINK, "Pending", "waiting for sink");
        manager.mark_false(SUBSCRIBED, "AuthFailed", "bad credentials");

        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert!(ready.is_false());
        assert_eq!(ready.reason, "AuthFailed");
    }

    #[test]
    fn test_unknown_dependent_makes_happy_unknown() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_true(SINK);

        // SUBSCRIBED was never marked; it materializes as Unknown.
        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert!(ready.is_unknown());
    }

    #[test]
    fn test_warning_severity_does_not_block() {
        let set = ConditionSet::new(
            READY,
            [
                DependentCondition::new(SINK),
                DependentCondition::warning(HEALTHY),
            ],
        );
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_true(SINK);
        manager.mark_false(HEALTHY, "Degraded", "adapter restarting");

        assert!(manager.is_happy());
        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert!(ready.reason.is_empty());
    }

    #[test]
    fn test_unknown_warning_dependent_does_not_block() {
        let set = ConditionSet::new(
            READY,
            [
                DependentCondition::new(SINK),
                DependentCondition::new(SUBSCRIBED),
                DependentCondition::warning(HEALTHY),
            ],
        );
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_true(SINK);
        manager.mark_true(SUBSCRIBED);
        manager.mark_unknown(HEALTHY, "Probing", "health probe pending");

        assert!(manager.is_happy());
        let ready = manager.get_condition(READY).expect("Ready should exist");
        assert!(ready.is_true());
        assert!(ready.reason.is_empty());

        // The advisory condition itself stays visible as Unknown.
        let healthy = manager.get_condition(HEALTHY).expect("condition should exist");
        assert!(healthy.is_unknown());
        assert_eq!(healthy.reason, "Probing");
    }

    #[test]
    fn test_mark_true_idempotent_preserves_transition_time() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        assert!(manager.mark_true(SINK));
        let stamp = manager
            .get_condition(SINK)
            .expect("condition should exist")
            .last_transition_time
            .clone();

        assert!(!manager.mark_true(SINK));
        let condition = manager.get_condition(SINK).expect("condition should exist");
        assert_eq!(condition.last_transition_time, stamp);
    }

    #[test]
    fn test_reason_only_update_keeps_transition_time() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_false(SINK, "ReasonA", "first attempt");
        let stamp = manager
            .get_condition(SINK)
            .expect("condition should exist")
            .last_transition_time
            .clone();

        assert!(manager.mark_false(SINK, "ReasonB", "second attempt"));
        let condition = manager.get_condition(SINK).expect("condition should exist");
        assert_eq!(condition.reason, "ReasonB");
        assert_eq!(condition.last_transition_time, stamp);
    }

    #[test]
    fn test_status_change_advances_transition_time() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_false(SINK, "NotResolved", "");
        let before = manager
            .get_condition(SINK)
            .expect("condition should exist")
            .last_transition_time
            .parse::<jiff::Timestamp>()
            .expect("timestamp should parse");

        manager.mark_true(SINK);
        let after = manager
            .get_condition(SINK)
            .expect("condition should exist")
            .last_transition_time
            .parse::<jiff::Timestamp>()
            .expect("timestamp should parse");
        assert!(after >= before);
    }

    #[test]
    fn test_get_condition_outside_schema_is_none() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.initialize_conditions();
        assert!(manager.get_condition("NoSuchType").is_none());
    }

    #[test]
    fn test_mark_outside_schema_gets_info_severity() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        let mut manager = set.manage(&mut status);
        manager.mark_true(SINK);
        manager.mark_true(SUBSCRIBED);
        manager.mark_false("Auxiliary", "SideChannel", "not part of the schema");

        let aux = manager
            .get_condition("Auxiliary")
            .expect("condition should exist");
        assert_eq!(aux.severity, ConditionSeverity::Info);
        assert!(manager.is_happy(), "non-schema conditions must not block");
    }

    #[test]
    fn test_conditions_sorted_by_type() {
        let set = two_dependent_set();
        let mut status = SourceStatus::default();
        set.manage(&mut status).initialize_conditions();
        let types: Vec<&str> = status.conditions.iter().map(|c| c.r#type.as_str()).collect();
        let mut sorted = types.clone();
        sorted.sort_unstable();
        assert_eq!(types, sorted);
    }
}
