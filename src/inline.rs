use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

/// A group of settings that is written inline, next to the keys of the
/// struct that owns it, instead of being nested under a key of its own.
pub(crate) trait InlineFields: DeserializeOwned {
    /// The keys this group claims from its owner's mapping.
    const FIELDS: &'static [&'static str];
}

/// Decode a mapping that holds both the owner's keys and an inlined group.
///
/// serde cannot combine `#[serde(flatten)]` with `deny_unknown_fields`, so
/// instead the mapping is split in two by [`InlineFields::FIELDS`] and each
/// half is decoded on its own. Both halves are expected to reject unknown
/// keys, which keeps the decoding strict overall.
pub(crate) fn split_inline<'de, D, O, I>(deserializer: D) -> Result<(O, I), D::Error>
where
    D: Deserializer<'de>,
    O: DeserializeOwned,
    I: InlineFields,
{
    let mut owned = Mapping::deserialize(deserializer)?;

    let mut inlined = Mapping::new();
    for field in I::FIELDS {
        if let Some(value) = owned.remove(*field) {
            inlined.insert(Value::from(*field), value);
        }
    }

    let owner = serde_yaml::from_value(Value::Mapping(owned)).map_err(D::Error::custom)?;
    let inlined = serde_yaml::from_value(Value::Mapping(inlined)).map_err(D::Error::custom)?;

    Ok((owner, inlined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Owner {
        name: String,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct Extra {
        verbose: bool,
    }

    impl InlineFields for Extra {
        const FIELDS: &'static [&'static str] = &["verbose"];
    }

    #[derive(Debug)]
    struct Both(Owner, Extra);

    impl<'de> Deserialize<'de> for Both {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let (owner, extra) = split_inline(deserializer)?;
            Ok(Both(owner, extra))
        }
    }

    #[test]
    fn splits_inlined_keys() {
        let both: Both = serde_yaml::from_str("name: a\nverbose: true\n").unwrap();
        assert_eq!(both.0.name, "a");
        assert!(both.1.verbose);
    }

    #[test]
    fn unknown_keys_are_still_rejected() {
        let err = serde_yaml::from_str::<Both>("name: a\nloud: true\n").unwrap_err();
        assert!(err.to_string().contains("unknown field `loud`"), "{err}");
    }
}
