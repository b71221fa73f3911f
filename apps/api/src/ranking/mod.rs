// Fit ranking: the oracle judges candidate/job fit, the ranker turns its groups
// and the commission fee into a single order.

pub mod oracle;
pub mod prompts;
pub mod ranker;
