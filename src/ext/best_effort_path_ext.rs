use std::path::{Component, Path, PathBuf};

/// Absolute forms of paths that may not exist yet
pub trait BestEffortPathExt {
    /// The canonical path when it can be resolved, otherwise the path made
    /// absolute against the current directory with `.` and `..` folded away.
    fn best_effort_absolute(&self) -> PathBuf;

    fn best_effort_path_display(&self) -> String {
        self.best_effort_absolute().display().to_string()
    }
}

impl BestEffortPathExt for Path {
    fn best_effort_absolute(&self) -> PathBuf {
        if let Ok(canonical) = self.canonicalize() {
            return canonical;
        }
        let absolute = std::path::absolute(self).unwrap_or_else(|_| self.to_path_buf());
        fold_dots(&absolute)
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_absolute(&self) -> PathBuf {
        self.as_path().best_effort_absolute()
    }
}

fn fold_dots(path: &Path) -> PathBuf {
    path.components()
        .fold(Vec::new(), |mut kept: Vec<Component>, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(kept.last(), Some(Component::Normal(_))) {
                        kept.pop();
                    }
                }
                other => kept.push(other),
            }
            kept
        })
        .iter()
        .collect()
}
