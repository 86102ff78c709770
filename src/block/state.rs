//! Block state - a block type plus its property assignment.

use std::collections::BTreeMap;
use std::fmt;

use serde::de;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::block::registry::BlockType;

/// Properties the store normalizes away on write; ignored by fuzzy equality.
const TRANSIENT_PROPS: &[&str] = &["powered", "triggered", "waterlogged"];

/// Immutable block type + property assignment.
///
/// Properties are kept in an ordered map so equality and serialization are
/// deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockState {
    ty: BlockType,
    props: BTreeMap<String, String>,
}

impl BlockState {
    /// Default state of a block type, with no properties set.
    pub fn new(ty: BlockType) -> Self {
        Self {
            ty,
            props: BTreeMap::new(),
        }
    }

    /// The air sentinel state.
    pub fn air() -> Self {
        Self::new(BlockType::AIR)
    }

    /// Return a copy with `name` set to `value`.
    pub fn with_prop(mut self, name: &str, value: &str) -> Self {
        self.props.insert(name.to_string(), value.to_string());
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.ty
    }

    /// Value of a named property, if set.
    pub fn prop(&self, name: &str) -> Option<&str> {
        self.props.get(name).map(String::as_str)
    }

    /// Whether this state is empty space.
    pub fn is_air(&self) -> bool {
        self.ty.is_air()
    }

    /// Placement-identity comparison.
    ///
    /// States are fuzzy-equal when the block type matches and all
    /// placement-relevant properties match; transient properties the store
    /// may normalize away are ignored.
    pub fn fuzzy_eq(&self, other: &BlockState) -> bool {
        if self.ty != other.ty {
            return false;
        }
        let relevant = |props: &BTreeMap<String, String>| -> Vec<(String, String)> {
            props
                .iter()
                .filter(|(k, _)| !TRANSIENT_PROPS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };
        relevant(&self.props) == relevant(&other.props)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty.name())?;
        if !self.props.is_empty() {
            let props: Vec<String> = self
                .props
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "[{}]", props.join(","))?;
        }
        Ok(())
    }
}

// States serialize by type name, not by interned id, so serialized edits
// stay valid across registry layout changes.
impl Serialize for BlockState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("BlockState", 2)?;
        st.serialize_field("type", self.ty.name())?;
        st.serialize_field("props", &self.props)?;
        st.end()
    }
}

impl<'de> Deserialize<'de> for BlockState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            #[serde(rename = "type")]
            ty: String,
            #[serde(default)]
            props: BTreeMap<String, String>,
        }

        let repr = Repr::deserialize(deserializer)?;
        let ty = BlockType::by_name(&repr.ty)
            .ok_or_else(|| de::Error::custom(format!("unknown block type: {}", repr.ty)))?;
        Ok(BlockState {
            ty,
            props: repr.props,
        })
    }
}
