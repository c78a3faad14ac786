use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::activation::activation::UpdateFunction;
use crate::error::{TopoError, TopoResult};
use crate::network::model::Model;
use crate::network::scnn::Scnn;
use crate::network::unigin::UniGin;

fn default_n_layers() -> usize {
    2
}

/// Constructor arguments of an `Scnn`.
///
/// Fields:
/// - `in_channels`           — feature width on the input simplices
/// - `intermediate_channels` — width between convolutions
/// - `out_channels`          — width fed to the linear readout
/// - `conv_order_down`       — highest power of the lower Laplacian
/// - `conv_order_up`         — highest power of the upper Laplacian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScnnSpec {
    pub in_channels: usize,
    pub intermediate_channels: usize,
    pub out_channels: usize,
    pub conv_order_down: usize,
    pub conv_order_up: usize,
    #[serde(default)]
    pub aggr_norm: bool,
    #[serde(default)]
    pub update_func: Option<UpdateFunction>,
    #[serde(default = "default_n_layers")]
    pub n_layers: usize,
}

/// Constructor arguments of a `UniGin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniGinSpec {
    pub in_channels_node: usize,
    pub intermediate_channels: usize,
    pub out_channels: usize,
    #[serde(default = "default_n_layers")]
    pub n_layers: usize,
}

/// Which architecture to build, tagged by `"model"` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum Architecture {
    #[serde(rename = "scnn")]
    Scnn(ScnnSpec),
    #[serde(rename = "unigin")]
    UniGin(UniGinSpec),
}

/// A serializable model description, stored apart from trained weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    #[serde(flatten)]
    pub architecture: Architecture,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelSpec {
    /// Checks widths and layer counts before anything is allocated.
    pub fn validate(&self) -> TopoResult<()> {
        let widths = match &self.architecture {
            Architecture::Scnn(s) => {
                if s.n_layers == 0 {
                    return Err(TopoError::InvalidConfig("scnn needs at least one layer".to_string()));
                }
                [s.in_channels, s.intermediate_channels, s.out_channels]
            }
            Architecture::UniGin(u) => [u.in_channels_node, u.intermediate_channels, u.out_channels],
        };
        if widths.contains(&0) {
            return Err(TopoError::InvalidConfig(format!(
                "model '{}' has a zero channel width", self.name
            )));
        }
        Ok(())
    }

    /// Validates the spec and builds a freshly initialized model.
    pub fn build(&self) -> TopoResult<Model> {
        self.validate()?;
        Ok(match &self.architecture {
            Architecture::Scnn(s) => Model::Scnn(Scnn::new(
                s.in_channels,
                s.intermediate_channels,
                s.out_channels,
                s.conv_order_down,
                s.conv_order_up,
                s.aggr_norm,
                s.update_func,
                s.n_layers,
            )?),
            Architecture::UniGin(u) => Model::UniGin(UniGin::new(
                u.in_channels_node,
                u.intermediate_channels,
                u.out_channels,
                u.n_layers,
            )),
        })
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> TopoResult<()> {
        super::persist::save_json(self, path)
    }

    pub fn load_json(path: impl AsRef<Path>) -> TopoResult<ModelSpec> {
        super::persist::load_json(path)
    }
}
