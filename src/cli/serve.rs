//! Development server.
//!
//! Startup order:
//! 1. live-reload channel and HTTP listener are bound
//! 2. image preprocessing starts in the background
//! 3. the watcher starts, so no change made during the start hook is lost
//! 4. the start hook runs on the orchestrator worker
//! 5. the HTTP request loop blocks until Ctrl+C

use std::sync::Arc;

use anyhow::Result;

use crate::{
    config::ConductorConfig,
    image::ImageJob,
    orchestrator::{INTERRUPT, Orchestrator, TaskQueue},
    reload::{NoopNotifier, ReloadNotifier, ReloadServer},
    runtime::{BuildMode, SystemRunner},
    serve::{DenyList, DevServer},
    watch::FsWatcher,
};

pub fn serve_site(config: &ConductorConfig) -> Result<()> {
    let serve = &config.serve;

    let reload = if serve.watch {
        Some(ReloadServer::start(serve.interface, serve.ws_port)?)
    } else {
        None
    };
    let ws_port = reload.as_ref().map(|r| r.port);
    let notifier: Arc<dyn ReloadNotifier> = match &reload {
        Some(server) => Arc::new(server.handle.clone()),
        None => Arc::new(NoopNotifier),
    };

    let server = DevServer::bind(
        serve.interface,
        serve.port,
        config.get_root(),
        DenyList::new(&serve.deny),
        ws_port,
    )?;

    let _images = ImageJob::spawn(config);

    let orchestrator = Orchestrator::new(config, BuildMode::Serve, Box::new(SystemRunner), notifier);
    let queue = TaskQueue::spawn(orchestrator)?;
    let cleanup_queue = queue.clone();
    let reload_handle = reload.as_ref().map(|r| r.handle.clone());
    INTERRUPT.attach(move || {
        if let Err(e) = cleanup_queue.submit(Orchestrator::on_close).wait() {
            crate::error!("clean"; "{:#}", e);
        }
        if let Some(handle) = &reload_handle {
            handle.shutdown();
        }
    });

    let _watcher = if serve.watch {
        let watch_queue = queue.clone();
        Some(FsWatcher::start(config, move |event| {
            watch_queue.spawn_task(move |o| o.handle_watch_event(&event));
        })?)
    } else {
        None
    };

    queue.spawn_task(|o| {
        // serve-mode start hook never returns Err
        let _ = o.on_build_start();
    });

    server.run()
}
