use std::path::PathBuf;

/// A tab inside a rename dialog.
///
/// `H` is whatever hosts the dialog. The host calls `init_tab` once with the
/// paths being renamed and `confirm_rename` when the user accepts; the tab
/// reports through `callback` whether the rename succeeded.
pub trait RenameTab<H: ?Sized> {
    fn init_tab(&mut self, host: &H, paths: Vec<PathBuf>);

    fn confirm_rename(&mut self, callback: Box<dyn FnOnce(bool) + '_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dialog {
        title: String,
    }

    #[derive(Default)]
    struct AppendSuffixTab {
        paths: Vec<PathBuf>,
        suffix: String,
        planned: Vec<PathBuf>,
    }

    impl RenameTab<Dialog> for AppendSuffixTab {
        fn init_tab(&mut self, host: &Dialog, paths: Vec<PathBuf>) {
            self.suffix = host.title.clone();
            self.paths = paths;
        }

        fn confirm_rename(&mut self, callback: Box<dyn FnOnce(bool) + '_>) {
            if self.suffix.is_empty() || self.paths.is_empty() {
                callback(false);
                return;
            }
            self.planned = self
                .paths
                .iter()
                .map(|p| {
                    let stem = p.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
                    p.with_file_name(format!("{}{}", stem, self.suffix))
                })
                .collect();
            callback(true);
        }
    }

    #[test]
    fn confirm_reports_success() {
        let mut tab = AppendSuffixTab::default();
        tab.init_tab(&Dialog { title: "_old".into() }, vec![PathBuf::from("/tmp/a.txt")]);

        let mut result = None;
        tab.confirm_rename(Box::new(|ok: bool| result = Some(ok)));

        assert_eq!(result, Some(true));
        assert_eq!(tab.planned, vec![PathBuf::from("/tmp/a_old")]);
    }

    #[test]
    fn confirm_without_paths_fails() {
        let mut tab = AppendSuffixTab::default();
        tab.init_tab(&Dialog { title: "_old".into() }, Vec::new());

        let mut result = None;
        tab.confirm_rename(Box::new(|ok: bool| result = Some(ok)));
        assert_eq!(result, Some(false));
    }
}
