/// One collection's exported metadata.
///
/// Records built from the server's configuration files carry all four
/// fields; records from the web API only carry the alias and title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRecord {
    pub alias: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_path: Option<String>,
}

impl CollectionRecord {
    pub fn from_api(alias: impl Into<String>, title: impl Into<String>) -> Self {
        CollectionRecord {
            alias: alias.into(),
            title: title.into(),
            description: None,
            thumbnail_path: None,
        }
    }

    pub fn from_local(
        alias: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        thumbnail_path: impl Into<String>,
    ) -> Self {
        CollectionRecord {
            alias: alias.into(),
            title: title.into(),
            description: Some(description.into()),
            thumbnail_path: Some(thumbnail_path.into()),
        }
    }

    /// Number of populated fields, in manifest order.
    pub fn field_count(&self) -> usize {
        2 + usize::from(self.description.is_some()) + usize::from(self.thumbnail_path.is_some())
    }

    /// Non-empty thumbnail reference, if any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Copy of this record with the thumbnail reduced to `basename`.
    pub fn with_thumbnail(&self, basename: impl Into<String>) -> Self {
        CollectionRecord {
            thumbnail_path: Some(basename.into()),
            ..self.clone()
        }
    }

    /// Serialize as one manifest line, including the trailing newline.
    ///
    /// Fields are not quoted. Tabs become spaces and line breaks are
    /// dropped so a field can never shift the downstream columns.
    pub fn to_tsv_line(&self) -> String {
        let mut fields = vec![sanitize_field(&self.alias), sanitize_field(&self.title)];
        if let Some(description) = &self.description {
            fields.push(sanitize_field(description));
        }
        if let Some(thumbnail) = &self.thumbnail_path {
            fields.push(sanitize_field(thumbnail));
        }
        let mut line = fields.join("\t");
        line.push('\n');
        line
    }
}

/// Whether `alias` can name a directory directly under the output root.
pub fn is_safe_alias(alias: &str) -> bool {
    !alias.is_empty()
        && alias != "."
        && alias != ".."
        && !alias.contains(['/', '\\'])
}

fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect()
}
