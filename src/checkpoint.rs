use crate::network::Network;
use crate::oracle::Snapshot;
use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Header of a checkpoint file, readable without the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub version: Version,
    pub state_size: usize,
    pub action_size: usize,
    pub hidden: usize,
}

/// A snapshot on disk, as JSON:
/// `{ "_meta": { version, state_size, action_size, hidden }, "network": { name: [..] } }`
/// with every parameter flattened row-major under its dotted name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(rename = "_meta")]
    meta: Meta,
    network: BTreeMap<String, Vec<f32>>,
}

impl TryFrom<&Snapshot> for Checkpoint {
    type Error = Error;
    fn try_from(snapshot: &Snapshot) -> Result<Self> {
        let network = snapshot.network();
        Ok(Self {
            meta: Meta {
                version: snapshot.version(),
                state_size: network.features(),
                action_size: network.actions(),
                hidden: network.hidden(),
            },
            network: network.export()?,
        })
    }
}

impl Checkpoint {
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Write through a sibling temp file and rename, so a crash never
    /// leaves a truncated checkpoint behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let ref temp = path.with_extension("json.tmp");
        std::fs::write(temp, serde_json::to_vec(self)?)?;
        std::fs::rename(temp, path)?;
        log::info!("saved checkpoint v{} to {}", self.meta.version, path.display());
        Ok(())
    }

    /// Read a checkpoint and check it fits a game with the given
    /// encoding width and action space.
    pub fn load(path: &Path, features: usize, actions: usize) -> Result<Snapshot> {
        let Self { meta, network } = serde_json::from_slice::<Self>(&std::fs::read(path)?)?;
        let model = Network::new(meta.state_size, meta.action_size, meta.hidden, NETWORK_SEED)?;
        model.validate(features, actions)?;
        model.import(&network)?;
        log::info!("loaded checkpoint v{} from {}", meta.version, path.display());
        Ok(Snapshot::new(meta.version, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("robotcg-{}-{}", name, std::process::id()))
            .join("oracle.json")
    }

    #[test]
    fn save_then_load() {
        let ref path = scratch("roundtrip");
        let snapshot = Snapshot::new(7, Network::new(5, 3, 4, 1).unwrap());
        Checkpoint::try_from(&snapshot).unwrap().save(path).unwrap();
        let loaded = Checkpoint::load(path, 5, 3).unwrap();
        assert_eq!(loaded.version(), 7);
        assert_eq!(loaded.network(), snapshot.network());
        assert!(!path.with_extension("json.tmp").exists());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn meta_is_written() {
        let ref path = scratch("meta");
        let snapshot = Snapshot::new(2, Network::new(6, 4, 3, 1).unwrap());
        Checkpoint::try_from(&snapshot).unwrap().save(path).unwrap();
        let bytes = std::fs::read(path).unwrap();
        let json = serde_json::from_slice::<serde_json::Value>(&bytes).unwrap();
        assert_eq!(json["_meta"]["version"], 2);
        assert_eq!(json["_meta"]["state_size"], 6);
        assert_eq!(json["_meta"]["action_size"], 4);
        assert_eq!(json["_meta"]["hidden"], 3);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let ref path = scratch("shape");
        let snapshot = Snapshot::new(1, Network::new(5, 3, 4, 1).unwrap());
        Checkpoint::try_from(&snapshot).unwrap().save(path).unwrap();
        let error = Checkpoint::load(path, 6, 3).unwrap_err();
        assert!(matches!(error, Error::Shape { what: "state size", .. }));
        assert!(Checkpoint::load(path, 5, 9).unwrap_err().is_config());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn truncated_parameters_are_rejected() {
        let ref path = scratch("truncated");
        let snapshot = Snapshot::new(1, Network::new(5, 3, 4, 1).unwrap());
        let mut checkpoint = Checkpoint::try_from(&snapshot).unwrap();
        checkpoint.network.get_mut("value.head.fc1.weight").unwrap().pop();
        checkpoint.save(path).unwrap();
        let error = Checkpoint::load(path, 5, 3).unwrap_err();
        assert!(matches!(error, Error::Shape { what: "parameter", .. }));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_io() {
        let ref path = scratch("missing");
        assert!(matches!(Checkpoint::load(path, 1, 1), Err(Error::Io(_))));
    }
}
