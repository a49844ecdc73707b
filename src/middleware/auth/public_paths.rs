/// Paths that skip token verification entirely (registration, login, health ...).
///
/// Matching is exact on the request path: no prefixes, no trailing-slash
/// normalisation, query string ignored.
#[derive(Debug, Clone, Default)]
pub struct PublicPaths {
    paths: Vec<String>,
}

impl PublicPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}
