//! Journals the close of every bar. Never trades.

use serde::{Deserialize, Serialize};

use crate::{JournalEntry, Strategy, StrategyBarResult, StrategyContext, StrategySpec};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogPriceParams {}

pub struct LogPriceStrategy;

impl LogPriceStrategy {
    pub fn new(_params: LogPriceParams) -> Self {
        Self
    }
}

impl Strategy for LogPriceStrategy {
    fn spec(&self) -> StrategySpec {
        StrategySpec::new("log_price")
    }

    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> StrategyBarResult {
        StrategyBarResult {
            journal: vec![JournalEntry::Message {
                ts: ctx.bar.ts,
                text: format!("Close, {:.2}", ctx.bar.close()),
            }],
            ..StrategyBarResult::idle()
        }
    }
}
