use super::*;
use crate::network::Network;
use crate::*;

/// An immutable, versioned copy of the oracle parameters.
///
/// Self-play workers share one `Arc<Snapshot>` for a whole iteration; the
/// trainer never mutates it. It trains a fork of the network and publishes
/// `succeed`'s result.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    version: Version,
    network: Network,
}

impl Snapshot {
    pub fn new(version: Version, network: Network) -> Self {
        Self { version, network }
    }
    /// a freshly initialised network at version 0
    pub fn initial(features: usize, actions: usize, seed: u64) -> Result<Self> {
        Ok(Self::new(0, Network::new(features, actions, HIDDEN, seed)?))
    }
    pub fn version(&self) -> Version {
        self.version
    }
    pub fn network(&self) -> &Network {
        &self.network
    }
    /// the next version, carrying updated parameters
    pub fn succeed(&self, network: Network) -> Self {
        Self::new(self.version + 1, network)
    }
}

impl Oracle for Snapshot {
    fn evaluate(&self, encoding: &[f32], legal: &[usize]) -> Result<Evaluation> {
        self.network.evaluate(encoding, legal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_increase() {
        let v0 = Snapshot::initial(4, 3, 0).unwrap();
        let v1 = v0.succeed(v0.network().clone());
        assert_eq!(v0.version(), 0);
        assert_eq!(v1.version(), 1);
        assert_eq!(v0.network(), v1.network());
    }

    #[test]
    fn delegates_to_network() {
        let snapshot = Snapshot::initial(4, 3, 0).unwrap();
        let ref x = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(
            snapshot.evaluate(x, &[0, 2]).unwrap(),
            snapshot.network().evaluate(x, &[0, 2]).unwrap()
        );
        assert!(snapshot.evaluate(&[0.; 3], &[0]).is_err());
    }
}
