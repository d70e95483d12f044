use crate::{ConfigError, TileKind, MAX_TILE_KINDS};

/// Ordered set of named tile types; a kind is the index of its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileCatalog {
    names: Vec<String>,
}

impl TileCatalog {
    /// Interns the provided names, rejecting empty, blank, duplicate or oversized catalogs.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if names.len() > MAX_TILE_KINDS {
            return Err(ConfigError::TooManyTileTypes {
                count: names.len(),
                max: MAX_TILE_KINDS,
            });
        }

        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::BlankTileType { index });
            }
            if names[..index].contains(name) {
                return Err(ConfigError::DuplicateTileType { name: name.clone() });
            }
        }

        Ok(Self { names })
    }

    /// Number of tile types in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Reports whether the catalog holds no tile types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every kind in catalog order.
    pub fn kinds(&self) -> impl Iterator<Item = TileKind> + '_ {
        (0..self.names.len()).map(|index| TileKind::new(index as u8))
    }

    /// Name registered for the kind.
    #[must_use]
    pub fn name(&self, kind: TileKind) -> Option<&str> {
        self.names.get(kind.index()).map(String::as_str)
    }

    /// Kind registered under the name.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<TileKind> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|index| TileKind::new(index as u8))
    }

    /// Every kind except `exclude`, in catalog order.
    #[must_use]
    pub fn candidates(&self, exclude: Option<TileKind>) -> Vec<TileKind> {
        self.kinds().filter(|kind| Some(*kind) != exclude).collect()
    }
}
