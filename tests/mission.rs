#[path = "support/harness.rs"]
mod harness;

#[path = "mission/critical_scenario.rs"]
mod critical_scenario;
#[path = "mission/policy_tiers.rs"]
mod policy_tiers;
#[path = "mission/state_durability.rs"]
mod state_durability;
