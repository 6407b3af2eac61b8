//! The variable/constraint set.

use super::constraint::{Constraint, ConstraintId};
use super::parameter::{Parameter, ParameterKind};
use super::variables::{AnyVariable, VarId, Variable};
use crate::domain::Domain;
use crate::error::{CspError, Result};
use crate::value::{Element, Value};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`VcSet`].
///
/// Solutions and networks remember the set they were built from and
/// compare identities before trusting their index handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetId(u64);

/// Owner of variables, parameters and constraints.
///
/// Everything is addressed by string id; the returned [`VarId`] /
/// [`ConstraintId`] handles are positions in insertion order and stay
/// valid for the lifetime of the set (nothing is ever removed).
///
/// A `VcSet` is `Send` but not `Sync`: solvers mutate variable values in
/// place, and concurrent solves over one set must be serialized by the
/// caller.
///
/// # Examples
///
/// ```
/// use u_csp::model::VcSet;
///
/// let mut set = VcSet::new();
/// set.add_bounded_variable("A", 1i64, 0, 5, 1).unwrap();
/// set.add_bounded_variable("B", 3i64, 0, 5, 1).unwrap();
/// set.add_constraint("c0", "A*B=12", &["A", "B"], |set, ids| {
///     Ok(set.value::<i64>(&ids[0])? * set.value::<i64>(&ids[1])? == 12)
/// })
/// .unwrap();
///
/// assert!(!set.check().unwrap());
/// set.set_value("A", 4i64).unwrap();
/// assert!(set.check().unwrap());
/// ```
#[derive(Debug)]
pub struct VcSet {
    id: SetId,
    variables: Vec<AnyVariable>,
    variable_index: HashMap<String, VarId>,
    parameters: Vec<Parameter>,
    parameter_index: HashMap<String, usize>,
    constraints: Vec<Constraint>,
    constraint_index: HashMap<String, ConstraintId>,
}

impl Default for VcSet {
    fn default() -> Self {
        Self::new()
    }
}

impl VcSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            id: SetId(NEXT_SET_ID.fetch_add(1, Ordering::Relaxed)),
            variables: Vec::new(),
            variable_index: HashMap::new(),
            parameters: Vec::new(),
            parameter_index: HashMap::new(),
            constraints: Vec::new(),
            constraint_index: HashMap::new(),
        }
    }

    pub fn set_id(&self) -> SetId {
        self.id
    }

    // ---- Construction ----

    /// Adds a variable held at `value` (single-point domain).
    pub fn add_variable<T: Element>(&mut self, id: impl Into<String>, value: T) -> Result<VarId> {
        self.push_variable(Variable::fixed(id, value))
    }

    /// Adds a variable ranging over `[low, high]/step`.
    pub fn add_bounded_variable<T: Element>(
        &mut self,
        id: impl Into<String>,
        value: T,
        low: T,
        high: T,
        step: T,
    ) -> Result<VarId> {
        self.push_variable(Variable::bounded(id, value, low, high, step)?)
    }

    /// Adds a variable with an explicit multi-interval domain.
    pub fn add_variable_with_domain<T: Element>(
        &mut self,
        id: impl Into<String>,
        value: T,
        domain: Domain<T>,
    ) -> Result<VarId> {
        self.push_variable(Variable::new(id, value, domain)?)
    }

    /// Takes ownership of a prepared variable.
    pub fn push_variable<T: Element>(&mut self, var: Variable<T>) -> Result<VarId> {
        if self.variable_index.contains_key(var.id()) {
            return Err(CspError::DuplicateVariableId(var.id().to_string()));
        }
        let handle = VarId(self.variables.len());
        debug!("add variable {var}");
        self.variable_index.insert(var.id().to_string(), handle);
        self.variables.push(T::into_variable(var));
        Ok(handle)
    }

    /// Groups existing variables under a parameter name.
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        kind: ParameterKind,
        components: &[&str],
    ) -> Result<&Parameter> {
        let name = name.into();
        if self.parameter_index.contains_key(&name) {
            return Err(CspError::DuplicateParameterId(name));
        }
        let handles = components
            .iter()
            .map(|id| self.lookup(id))
            .collect::<Result<Vec<_>>>()?;
        let parameter = Parameter::new(name, kind, handles)?;
        let index = self.parameters.len();
        self.parameter_index
            .insert(parameter.name().to_string(), index);
        self.parameters.push(parameter);
        Ok(&self.parameters[index])
    }

    /// Creates the component variables of a parameter and the parameter
    /// itself.
    ///
    /// Scalars get one variable named `name`; points and vectors get
    /// `name.x`, `name.y`, `name.z`. All components share the bounds
    /// `[low, high]/step`. Nothing is added when any step fails.
    pub fn add_parameter_components<T: Element>(
        &mut self,
        name: &str,
        kind: ParameterKind,
        values: &[T],
        low: T,
        high: T,
        step: T,
    ) -> Result<Vec<VarId>> {
        if values.len() != kind.arity() {
            return Err(CspError::ParameterArity {
                name: name.to_string(),
                kind: kind.to_string(),
                expected: kind.arity(),
                found: values.len(),
            });
        }
        if self.parameter_index.contains_key(name) {
            return Err(CspError::DuplicateParameterId(name.to_string()));
        }
        let ids: Vec<String> = kind.suffixes().iter().map(|s| format!("{name}{s}")).collect();
        if let Some(taken) = ids.iter().find(|id| self.variable_index.contains_key(*id)) {
            return Err(CspError::DuplicateVariableId(taken.clone()));
        }
        let vars = ids
            .iter()
            .zip(values)
            .map(|(id, &value)| Variable::bounded(id.clone(), value, low, high, step))
            .collect::<Result<Vec<_>>>()?;

        let mut handles = Vec::with_capacity(vars.len());
        for var in vars {
            handles.push(self.push_variable(var)?);
        }
        let components: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.add_parameter(name, kind, &components)?;
        Ok(handles)
    }

    /// Adds a constraint over the listed variables.
    ///
    /// Every id must already exist; each referenced variable becomes
    /// constrained. The evaluator receives the ids in the given order.
    pub fn add_constraint<F>(
        &mut self,
        id: impl Into<String>,
        expression: impl Into<String>,
        variable_ids: &[&str],
        evaluator: F,
    ) -> Result<ConstraintId>
    where
        F: Fn(&VcSet, &[String]) -> Result<bool> + Send + Sync + 'static,
    {
        let id = id.into();
        if self.constraint_index.contains_key(&id) {
            return Err(CspError::DuplicateConstraintId(id));
        }
        if variable_ids.is_empty() {
            return Err(CspError::EmptyConstraint(id));
        }
        let handles = variable_ids
            .iter()
            .map(|v| self.lookup(v))
            .collect::<Result<Vec<_>>>()?;
        for &h in &handles {
            self.variables[h.0].mark_constrained();
        }

        let handle = ConstraintId(self.constraints.len());
        let constraint = Constraint::new(
            id.clone(),
            expression.into(),
            variable_ids.iter().map(|s| s.to_string()).collect(),
            handles,
            Box::new(evaluator),
        );
        debug!("add constraint {constraint}");
        self.constraint_index.insert(id, handle);
        self.constraints.push(constraint);
        Ok(handle)
    }

    // ---- Lookup ----

    /// Handle of the variable named `id`.
    pub fn lookup(&self, id: &str) -> Result<VarId> {
        self.variable_index
            .get(id)
            .copied()
            .ok_or_else(|| CspError::UnknownId(id.to_string()))
    }

    /// The variable named `id`.
    pub fn variable(&self, id: &str) -> Result<&AnyVariable> {
        let h = self.lookup(id)?;
        Ok(&self.variables[h.0])
    }

    pub fn variable_mut(&mut self, id: &str) -> Result<&mut AnyVariable> {
        let h = self.lookup(id)?;
        Ok(&mut self.variables[h.0])
    }

    /// The variable behind a handle, if the handle belongs to this set.
    pub fn get(&self, handle: VarId) -> Option<&AnyVariable> {
        self.variables.get(handle.0)
    }

    pub(crate) fn var(&self, handle: VarId) -> &AnyVariable {
        &self.variables[handle.0]
    }

    pub(crate) fn var_mut(&mut self, handle: VarId) -> &mut AnyVariable {
        &mut self.variables[handle.0]
    }

    /// The variable named `id` with its element type checked.
    pub fn typed<T: Element>(&self, id: &str) -> Result<&Variable<T>> {
        let var = self.variable(id)?;
        T::from_variable(var).ok_or_else(|| CspError::TypeMismatch {
            id: id.to_string(),
            expected: T::KIND,
            found: var.kind(),
        })
    }

    pub fn typed_mut<T: Element>(&mut self, id: &str) -> Result<&mut Variable<T>> {
        let var = self.variable_mut(id)?;
        let found = var.kind();
        T::from_variable_mut(var).ok_or_else(|| CspError::TypeMismatch {
            id: id.to_string(),
            expected: T::KIND,
            found,
        })
    }

    /// Current value of the variable named `id`.
    pub fn value<T: Element>(&self, id: &str) -> Result<T> {
        self.typed::<T>(id).map(Variable::value)
    }

    pub fn value_of(&self, handle: VarId) -> Option<Value> {
        self.get(handle).map(AnyVariable::value)
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<Value>) -> Result<()> {
        self.variable_mut(id)?.set_value(value.into())
    }

    pub fn set_const(&mut self, id: &str, is_const: bool) -> Result<()> {
        self.variable_mut(id)?.set_const(is_const);
        Ok(())
    }

    /// The parameter named `name`.
    pub fn parameter(&self, name: &str) -> Result<&Parameter> {
        self.parameter_index
            .get(name)
            .map(|&i| &self.parameters[i])
            .ok_or_else(|| CspError::UnknownId(name.to_string()))
    }

    /// Current component values of a parameter.
    pub fn parameter_values(&self, name: &str) -> Result<Vec<Value>> {
        let parameter = self.parameter(name)?;
        Ok(parameter
            .variables()
            .iter()
            .map(|&h| self.var(h).value())
            .collect())
    }

    /// Toggles const on every component of a parameter.
    pub fn set_parameter_const(&mut self, name: &str, is_const: bool) -> Result<()> {
        let index = *self
            .parameter_index
            .get(name)
            .ok_or_else(|| CspError::UnknownId(name.to_string()))?;
        for &h in self.parameters[index].variables() {
            self.variables[h.0].set_const(is_const);
        }
        Ok(())
    }

    /// The constraint named `id`.
    pub fn constraint(&self, id: &str) -> Result<&Constraint> {
        self.constraint_index
            .get(id)
            .map(|h| &self.constraints[h.0])
            .ok_or_else(|| CspError::UnknownId(id.to_string()))
    }

    pub(crate) fn constraint_at(&self, handle: ConstraintId) -> &Constraint {
        &self.constraints[handle.0]
    }

    pub fn variables(&self) -> &[AnyVariable] {
        &self.variables
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// All variable handles in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = VarId> {
        (0..self.variables.len()).map(VarId)
    }

    /// Constrained, non-const variables in insertion order.
    pub fn free_variables(&self) -> Vec<VarId> {
        self.handles().filter(|&h| self.var(h).is_free()).collect()
    }

    // ---- Checkpointing ----

    /// Copies every value into its checkpoint slot.
    pub fn store(&mut self) {
        self.variables.iter_mut().for_each(AnyVariable::store);
    }

    /// Resets every value from its checkpoint slot.
    pub fn restore(&mut self) {
        self.variables.iter_mut().for_each(AnyVariable::restore);
    }

    pub(crate) fn states(&self) -> Vec<(Value, Value)> {
        self.variables.iter().map(AnyVariable::state).collect()
    }

    pub(crate) fn reset_states(&mut self, states: &[(Value, Value)]) {
        for (var, &state) in self.variables.iter_mut().zip(states) {
            var.reset_state(state);
        }
    }

    // ---- Evaluation ----

    /// Logical AND over all constraints, stopping at the first failure.
    pub fn check(&self) -> Result<bool> {
        for constraint in &self.constraints {
            if !constraint.check(self)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Like [`check`](Self::check), but constraints that reference a
    /// variable not marked in `labeled` count as satisfied.
    pub fn check_labeled(&self, labeled: &[bool]) -> Result<bool> {
        for constraint in &self.constraints {
            if constraint.is_ready(labeled) && !constraint.check(self)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Display for VcSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variables:")?;
        for var in &self.variables {
            writeln!(f, "  {var}")?;
        }
        if !self.parameters.is_empty() {
            writeln!(f, "Parameters:")?;
            for p in &self.parameters {
                let names: Vec<&str> = p.variables().iter().map(|&h| self.var(h).id()).collect();
                writeln!(f, "  {} ({}): {}", p.name(), p.kind(), names.join(", "))?;
            }
        }
        writeln!(f, "Constraints:")?;
        for c in &self.constraints {
            writeln!(f, "  {c}")?;
        }
        Ok(())
    }
}
