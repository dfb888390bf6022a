use common::{AnalysisResult, Suggestion, TradePlan, TradingParameters};

/// Builds entry, target and stop levels for actionable suggestions
#[derive(Debug, Clone, Default)]
pub struct TradePlanner {
    params: TradingParameters,
}

impl TradePlanner {
    pub fn new(params: &TradingParameters) -> Self {
        Self {
            params: params.clone(),
        }
    }

    /// None for `hold`
    pub fn plan(&self, suggestion: Suggestion, entry_price: f64) -> Option<TradePlan> {
        let (target_price, stop_loss_price) = match suggestion {
            Suggestion::Buy => (
                entry_price * (1.0 + self.params.take_profit_pct),
                entry_price * (1.0 - self.params.stop_loss_pct),
            ),
            Suggestion::Sell => (
                entry_price * (1.0 - self.params.take_profit_pct),
                entry_price * (1.0 + self.params.stop_loss_pct),
            ),
            Suggestion::Hold => return None,
        };

        let risk = (entry_price - stop_loss_price).abs();
        let risk_reward_ratio = if risk == 0.0 {
            0.0
        } else {
            (target_price - entry_price).abs() / risk
        };

        Some(TradePlan {
            entry_price,
            target_price,
            stop_loss_price,
            risk_reward_ratio,
        })
    }

    pub fn plan_for(&self, result: &AnalysisResult) -> Option<TradePlan> {
        self.plan(result.suggestion, result.current_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_buy_plan() {
        let planner = TradePlanner::default();
        let plan = planner.plan(Suggestion::Buy, 100.0).unwrap();

        assert_relative_eq!(plan.target_price, 105.0, epsilon = 1e-9);
        assert_relative_eq!(plan.stop_loss_price, 98.0, epsilon = 1e-9);
        assert_relative_eq!(plan.risk_reward_ratio, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_sell_plan_is_mirrored() {
        let planner = TradePlanner::default();
        let plan = planner.plan(Suggestion::Sell, 100.0).unwrap();

        assert_relative_eq!(plan.target_price, 95.0, epsilon = 1e-9);
        assert_relative_eq!(plan.stop_loss_price, 102.0, epsilon = 1e-9);
        assert_relative_eq!(plan.risk_reward_ratio, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_hold_has_no_plan() {
        assert!(TradePlanner::default().plan(Suggestion::Hold, 100.0).is_none());
    }

    #[test]
    fn test_custom_distances() {
        let params = TradingParameters {
            stop_loss_pct: 0.05,
            take_profit_pct: 0.05,
        };
        let plan = TradePlanner::new(&params).plan(Suggestion::Buy, 200.0).unwrap();

        assert_relative_eq!(plan.risk_reward_ratio, 1.0, epsilon = 1e-9);
    }
}
