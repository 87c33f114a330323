//! Agents, their programs, and the engine-installed tracer.
//!
//! An agent's program is stored data, not a method on the agent: it receives
//! the percept and nothing else, so it cannot peek at the agent, the world,
//! or other agents. A program that needs a model of the world has to build
//! one from its percepts.

use core::fmt;

use tickworld_types::{EntityId, EntityKind};
use tracing::debug;

use crate::entity::Entity;

/// A policy mapping one percept to one action.
///
/// Implemented for every `FnMut(&P) -> A` closure, so most programs are
/// plain closures. Programs may keep private state (a seeded RNG, an
/// internal model), which is why the entry point takes `&mut self`.
pub trait AgentProgram<P, A> {
    /// Choose an action for this tick.
    fn decide(&mut self, percept: &P) -> A;
}

impl<P, A, F> AgentProgram<P, A> for F
where
    F: FnMut(&P) -> A,
{
    fn decide(&mut self, percept: &P) -> A {
        self(percept)
    }
}

/// Wraps a program and logs every percept/action pair.
///
/// Installed by the world when an agent is registered; the wrapped program
/// sees the same percepts and its actions pass through unchanged.
struct Traced<P, A> {
    agent: EntityId,
    label: String,
    inner: Box<dyn AgentProgram<P, A>>,
}

impl<P: fmt::Debug, A: fmt::Debug> AgentProgram<P, A> for Traced<P, A> {
    fn decide(&mut self, percept: &P) -> A {
        let action = self.inner.decide(percept);
        debug!(
            agent = %self.agent,
            label = %self.label,
            ?percept,
            ?action,
            "Agent perceives and acts"
        );
        action
    }
}

/// An entity bound to a program and a performance measure.
pub struct Agent<P, A> {
    body: Entity,
    program: Box<dyn AgentProgram<P, A>>,
    performance: i64,
    traced: bool,
}

impl<P, A> Agent<P, A>
where
    P: fmt::Debug + 'static,
    A: fmt::Debug + 'static,
{
    /// Create an agent from the program produced by its factory.
    pub fn new(label: impl Into<String>, program: impl AgentProgram<P, A> + 'static) -> Self {
        Self {
            body: Entity::new(EntityKind::Agent).with_label(label),
            program: Box::new(program),
            performance: 0,
            traced: false,
        }
    }

    /// Prepare the agent for registration: zero performance and wrap the
    /// program in the tracer (once).
    pub(crate) fn enroll(mut self) -> Self {
        self.performance = 0;
        if self.traced {
            return self;
        }
        let Self {
            body,
            program,
            performance,
            ..
        } = self;
        let program: Box<dyn AgentProgram<P, A>> = Box::new(Traced {
            agent: body.id(),
            label: body.label().to_owned(),
            inner: program,
        });
        Self {
            body,
            program,
            performance,
            traced: true,
        }
    }
}

impl<P, A> Agent<P, A> {
    /// Identity shared with the agent's body in the entity collection.
    pub const fn id(&self) -> EntityId {
        self.body.id()
    }

    /// The agent's physical body.
    pub const fn body(&self) -> &Entity {
        &self.body
    }

    /// Mutable access to the agent's physical body.
    pub const fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }

    /// Whether the agent is alive.
    pub const fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    /// Accumulated performance score.
    pub const fn performance(&self) -> i64 {
        self.performance
    }

    /// Adjust performance by `delta`. Saturates at the `i64` limits.
    pub const fn add_performance(&mut self, delta: i64) {
        self.performance = self.performance.saturating_add(delta);
    }

    /// Whether the engine has installed its tracer around the program.
    pub const fn is_traced(&self) -> bool {
        self.traced
    }

    /// Run the program on a percept.
    pub fn decide(&mut self, percept: &P) -> A {
        self.program.decide(percept)
    }
}

impl<P, A> fmt::Debug for Agent<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("body", &self.body)
            .field("performance", &self.performance)
            .field("traced", &self.traced)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_programs_decide() {
        let mut agent: Agent<u8, u8> = Agent::new("doubler", |p: &u8| p.saturating_mul(2));
        assert_eq!(agent.decide(&21), 42);
    }

    #[test]
    fn stateful_programs_keep_state() {
        let mut calls = 0_u32;
        let mut agent: Agent<(), u32> = Agent::new("counter", move |_: &()| {
            calls = calls.saturating_add(1);
            calls
        });
        assert_eq!(agent.decide(&()), 1);
        assert_eq!(agent.decide(&()), 2);
    }

    #[test]
    fn enroll_traces_once_and_preserves_actions() {
        let mut agent: Agent<i32, i32> = Agent::new("negate", |p: &i32| -p);
        agent.add_performance(7);
        let agent = agent.enroll();
        assert!(agent.is_traced());
        assert_eq!(agent.performance(), 0);

        let mut agent = agent.enroll();
        assert!(agent.is_traced());
        assert_eq!(agent.decide(&5), -5);
    }

    #[test]
    fn performance_can_go_negative_and_saturates() {
        let mut agent: Agent<(), ()> = Agent::new("idle", |_: &()| ());
        agent.add_performance(-3);
        assert_eq!(agent.performance(), -3);
        agent.add_performance(i64::MIN);
        assert_eq!(agent.performance(), i64::MIN);
    }
}
