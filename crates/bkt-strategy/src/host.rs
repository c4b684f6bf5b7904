use bkt_portfolio::ClosedTrade;

use crate::{
    JournalEntry, Strategy, StrategyBarResult, StrategyContext, StrategyHostError, StrategySpec,
};

/// StrategyHost enforces:
/// - exactly one strategy
/// - hooks are never called before registration
#[derive(Default)]
pub struct StrategyHost {
    strategy: Option<Box<dyn Strategy>>,
    spec: Option<StrategySpec>,
}

impl StrategyHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, s: Box<dyn Strategy>) -> Result<(), StrategyHostError> {
        if self.strategy.is_some() {
            return Err(StrategyHostError::MultiStrategyNotAllowed);
        }
        self.spec = Some(s.spec());
        self.strategy = Some(s);
        Ok(())
    }

    pub fn spec(&self) -> Result<StrategySpec, StrategyHostError> {
        self.spec.clone().ok_or(StrategyHostError::NoStrategyRegistered)
    }

    pub fn on_bar(
        &mut self,
        ctx: &StrategyContext<'_>,
    ) -> Result<StrategyBarResult, StrategyHostError> {
        let s = self
            .strategy
            .as_mut()
            .ok_or(StrategyHostError::NoStrategyRegistered)?;
        Ok(s.on_bar(ctx))
    }

    pub fn on_trade_closed(
        &mut self,
        trade: &ClosedTrade,
    ) -> Result<Vec<JournalEntry>, StrategyHostError> {
        let s = self
            .strategy
            .as_mut()
            .ok_or(StrategyHostError::NoStrategyRegistered)?;
        Ok(s.on_trade_closed(trade))
    }
}
