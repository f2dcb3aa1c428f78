/// Estimate, in Mbps, used when the platform gives no bandwidth hint.
pub const DEFAULT_BANDWIDTH_MBPS: f64 = 10.;

/// Source of a best-effort estimate of the current downlink bandwidth.
///
/// No request is ever performed to obtain it: implementations only relay what the platform
/// already knows (e.g. `navigator.connection.downlink` in browsers).
pub trait BandwidthHint {
    /// Returns the current estimate in Mbps, `None` if unavailable.
    fn estimate_mbps(&self) -> Option<f64>;
}

/// `BandwidthHint` always giving back the same value.
pub struct FixedBandwidth(pub Option<f64>);

impl BandwidthHint for FixedBandwidth {
    fn estimate_mbps(&self) -> Option<f64> {
        self.0
    }
}

/// Produces the bandwidth estimate on which quality choices are based, falling back to a
/// configured default when the hint is absent or unusable.
pub(crate) struct AdaptiveQualitySelector {
    hint: Box<dyn BandwidthHint>,
    default_bandwidth: f64,
}

impl AdaptiveQualitySelector {
    pub(crate) fn new(hint: Box<dyn BandwidthHint>) -> Self {
        Self {
            hint,
            default_bandwidth: DEFAULT_BANDWIDTH_MBPS,
        }
    }

    /// Returns the current bandwidth estimate, in Mbps.
    pub(crate) fn get_estimate(&self) -> f64 {
        match self.hint.estimate_mbps() {
            Some(bw) if bw.is_finite() && bw >= 0. => bw,
            _ => self.default_bandwidth,
        }
    }

    pub(crate) fn update_default_bandwidth(&mut self, default_bandwidth: f64) {
        self.default_bandwidth = default_bandwidth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_falls_back_to_default() {
        let selector = AdaptiveQualitySelector::new(Box::new(FixedBandwidth(None)));
        assert_eq!(selector.get_estimate(), DEFAULT_BANDWIDTH_MBPS);

        let selector = AdaptiveQualitySelector::new(Box::new(FixedBandwidth(Some(f64::NAN))));
        assert_eq!(selector.get_estimate(), DEFAULT_BANDWIDTH_MBPS);

        let mut selector = AdaptiveQualitySelector::new(Box::new(FixedBandwidth(Some(-1.))));
        selector.update_default_bandwidth(3.);
        assert_eq!(selector.get_estimate(), 3.);
    }

    #[test]
    fn test_estimate_uses_hint() {
        let selector = AdaptiveQualitySelector::new(Box::new(FixedBandwidth(Some(1.5))));
        assert_eq!(selector.get_estimate(), 1.5);
    }
}
