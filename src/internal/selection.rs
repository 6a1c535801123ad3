use super::models::Article;

/// Which article, if any, is open in the detail view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    None,
    Selected(Article),
}

impl Selection {
    /// Open `article`, or close it if it is the one already open (matched by title).
    pub fn select(&mut self, article: &Article) {
        *self = match self {
            Self::Selected(current) if current.title == article.title => Self::None,
            _ => Self::Selected(article.clone()),
        };
    }

    /// Close the detail view. Returns `true` if something was open.
    pub fn close(&mut self) -> bool {
        match std::mem::take(self) {
            Self::None => false,
            Self::Selected(_) => true,
        }
    }

    pub fn article(&self) -> Option<&Article> {
        match self {
            Self::None => None,
            Self::Selected(article) => Some(article),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.article().map(|a| a.title.as_str())
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }
}
