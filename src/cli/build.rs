//! Production build.
//!
//! Phases:
//! - **Images** - start preprocessing in the background
//! - **Start** - bootstrap, styles, two full renders (failure aborts)
//! - **Publish** - copy rendered output into `[build].out_dir`
//! - **Close** - renderer cleanup, always attempted

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{
    config::ConductorConfig,
    image::ImageJob,
    log,
    orchestrator::{INTERRUPT, Orchestrator, TaskQueue},
    reload::NoopNotifier,
    runtime::{BuildMode, SystemRunner},
    utils::fs::{copy_recursive, recreate_dir},
};

/// Run the full production pipeline.
pub fn build_site(config: &ConductorConfig) -> Result<()> {
    let images = ImageJob::spawn(config);

    let orchestrator = Orchestrator::new(
        config,
        BuildMode::Production,
        Box::new(SystemRunner),
        Arc::new(NoopNotifier),
    );
    let queue = TaskQueue::spawn(orchestrator)?;
    attach_cleanup(&queue);

    let started = queue.submit(Orchestrator::on_build_start).wait()?;

    if let Some(handle) = images
        && handle.join().is_err()
    {
        crate::error!("images"; "preprocessing thread panicked");
    }

    let published = started.and_then(|()| publish(config));
    queue.submit(Orchestrator::on_close).wait()?;

    let files = published?;
    log!("build"; "published {} files to {}", files, config.out_dir().display());
    Ok(())
}

/// Copy every existing `[build].publish` entry from the root into `out_dir`.
pub fn publish(config: &ConductorConfig) -> Result<usize> {
    let out_dir = config.out_dir();
    recreate_dir(&out_dir)?;

    let mut files = 0;
    for entry in &config.build.publish {
        let src = config.root_join(entry);
        if !src.exists() {
            crate::debug!("publish"; "skipping missing {}", entry.display());
            continue;
        }
        files += copy_recursive(&src, &out_dir.join(entry))
            .with_context(|| format!("Failed to publish {}", entry.display()))?;
    }
    Ok(files)
}

/// Run renderer cleanup through the queue on Ctrl+C.
fn attach_cleanup(queue: &TaskQueue) {
    let queue = queue.clone();
    INTERRUPT.attach(move || {
        if let Err(e) = queue.submit(Orchestrator::on_close).wait() {
            crate::error!("clean"; "{:#}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_publish_copies_existing_entries_only() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("index.html"), "home").unwrap();
        fs::create_dir_all(root.join("blog/first")).unwrap();
        fs::write(root.join("blog/first/index.html"), "post").unwrap();
        fs::create_dir_all(root.join("dist/stale")).unwrap();

        let config = test_config_at(root);
        let files = publish(&config).unwrap();

        assert_eq!(files, 2);
        assert!(root.join("dist/index.html").is_file());
        assert!(root.join("dist/blog/first/index.html").is_file());
        assert!(!root.join("dist/stale").exists());
        assert!(!root.join("dist/sitemap.xml").exists());
    }
}
