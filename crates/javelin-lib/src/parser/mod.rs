//! Recursive-descent parser over the token stream.
//!
//! # Architecture
//!
//! - Predictive parsing with bounded look-ahead (`nth`), plus cursor
//!   snapshots for the few ambiguous constructs that need speculation
//!   (typed lambda vs. cast vs. parenthesized expression, generics vs.
//!   less-than, method references)
//! - Post-order allocation: a parent node is allocated only after all of
//!   its children, so ids are topologically ordered and a linear arena
//!   walk visits children before parents
//! - Comments ride along: comment tokens passed over by `advance` queue
//!   up and attach as children of the innermost node whose span contains
//!   them, merged into the child list in source order
//! - Fail-fast: the first unexpected token aborts the parse with a
//!   located error; there is no recovery and no partial tree is exposed
//!
//! Two budgets bound adversarial input: the recursion-depth cap and the
//! arena watchdog (node count + soft memory ceiling).

pub(crate) mod core;
mod grammar;

#[cfg(test)]
mod tests;
