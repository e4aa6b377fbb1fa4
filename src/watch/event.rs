//! Watch events and their derivation from raw `notify` events.

use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use smallvec::SmallVec;

/// Kind of filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchKind {
    Add,
    Change,
    Unlink,
}

impl WatchKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Change => "change",
            Self::Unlink => "unlink",
        }
    }
}

/// A single change to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchKind,
    pub path: PathBuf,
}

impl WatchEvent {
    pub fn new(kind: WatchKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn add(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchKind::Add, path)
    }

    pub fn change(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchKind::Change, path)
    }

    pub fn unlink(path: impl Into<PathBuf>) -> Self {
        Self::new(WatchKind::Unlink, path)
    }
}

/// Translate one raw event into file-level watch events.
///
/// Directory events and metadata-only modifications yield nothing.
pub fn from_notify(event: &notify::Event) -> SmallVec<[WatchEvent; 2]> {
    let mut out = SmallVec::new();

    match event.kind {
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => {}
        // Ignore metadata-only changes (mtime/atime/chmod noise)
        EventKind::Modify(ModifyKind::Metadata(_)) => {}
        EventKind::Create(_) => push_file(&mut out, WatchKind::Add, &event.paths),
        EventKind::Remove(_) => {
            out.extend(event.paths.iter().map(|p| WatchEvent::unlink(p.clone())));
        }
        EventKind::Modify(ModifyKind::Name(mode)) => match (mode, event.paths.as_slice()) {
            (RenameMode::From, paths) => {
                out.extend(paths.iter().map(|p| WatchEvent::unlink(p.clone())));
            }
            (RenameMode::To, paths) => push_file(&mut out, WatchKind::Add, paths),
            (RenameMode::Both, [from, to]) => {
                out.push(WatchEvent::unlink(from.clone()));
                push_file(&mut out, WatchKind::Add, std::slice::from_ref(to));
            }
            (_, paths) => {
                for path in paths {
                    if path.exists() {
                        push_file(&mut out, WatchKind::Add, std::slice::from_ref(path));
                    } else {
                        out.push(WatchEvent::unlink(path.clone()));
                    }
                }
            }
        },
        EventKind::Modify(_) => {
            for path in &event.paths {
                // A change to a file that is already gone is a deletion
                if !path.exists() {
                    out.push(WatchEvent::unlink(path.clone()));
                } else if !path.is_dir() {
                    out.push(WatchEvent::change(path.clone()));
                }
            }
        }
        _ => {}
    }

    out
}

fn push_file(out: &mut SmallVec<[WatchEvent; 2]>, kind: WatchKind, paths: &[PathBuf]) {
    out.extend(
        paths
            .iter()
            .filter(|p| !Path::is_dir(p))
            .map(|p| WatchEvent::new(kind, p.clone())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{DataChange, MetadataKind};
    use tempfile::TempDir;

    fn raw(kind: EventKind, paths: &[&Path]) -> notify::Event {
        let mut event = notify::Event::new(kind);
        for path in paths {
            event = event.add_path(path.to_path_buf());
        }
        event
    }

    #[test]
    fn test_create_and_remove_map_to_add_and_unlink() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("post.md");
        std::fs::write(&file, "x").unwrap();

        let events = from_notify(&raw(EventKind::Create(CreateKind::File), &[&file]));
        assert_eq!(events.as_slice(), [WatchEvent::add(&file)]);

        let gone = temp.path().join("gone.md");
        let events = from_notify(&raw(EventKind::Remove(RemoveKind::File), &[&gone]));
        assert_eq!(events.as_slice(), [WatchEvent::unlink(&gone)]);
    }

    #[test]
    fn test_data_modify_is_change_and_metadata_is_ignored() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("base.html");
        std::fs::write(&file, "x").unwrap();

        let data = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        assert_eq!(from_notify(&raw(data, &[&file])).as_slice(), [WatchEvent::change(&file)]);

        let meta = EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime));
        assert!(from_notify(&raw(meta, &[&file])).is_empty());
    }

    #[test]
    fn test_change_of_vanished_file_is_unlink() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("vanished.md");
        let data = EventKind::Modify(ModifyKind::Data(DataChange::Any));
        assert_eq!(from_notify(&raw(data, &[&file])).as_slice(), [WatchEvent::unlink(&file)]);
    }

    #[test]
    fn test_rename_both_splits_into_unlink_and_add() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("old.md");
        let to = temp.path().join("new.md");
        std::fs::write(&to, "x").unwrap();

        let kind = EventKind::Modify(ModifyKind::Name(RenameMode::Both));
        assert_eq!(
            from_notify(&raw(kind, &[&from, &to])).as_slice(),
            [WatchEvent::unlink(&from), WatchEvent::add(&to)]
        );
    }

    #[test]
    fn test_directory_events_dropped() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("posts");
        std::fs::create_dir(&dir).unwrap();

        assert!(from_notify(&raw(EventKind::Create(CreateKind::Folder), &[&dir])).is_empty());
        assert!(from_notify(&raw(EventKind::Create(CreateKind::Any), &[&dir])).is_empty());
    }
}
