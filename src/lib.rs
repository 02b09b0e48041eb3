//! Football match outcome estimation. Recent form, squad and venue data drive a heuristic
//! win model, independent Poisson goal rates drive the scoreline markets, and the result is
//! blended with bookmaker prices to flag value bets.

pub mod cache;
pub mod domain;
pub mod factorial;
pub mod features;
pub mod file;
pub mod fixture;
pub mod goals;
pub mod league;
pub mod linear;
pub mod market;
pub mod poisson;
pub mod prediction;
pub mod print;
pub mod probs;
pub mod scoregrid;
pub mod simulation;
pub mod synthetic;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
