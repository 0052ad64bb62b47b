#![allow(dead_code)]

pub mod app {
    use std::sync::Arc;

    use navrouter::history::MemoryHistory;
    use navrouter::router::Router;

    pub const ORIGIN: &str = "http://app.test/";

    /// A router over a fresh in-memory history at [`ORIGIN`].
    pub fn router() -> (Router<&'static str>, Arc<MemoryHistory>) {
        let history = Arc::new(MemoryHistory::new(ORIGIN.parse().unwrap()));
        let router = Router::new(Arc::clone(&history));
        (router, history)
    }

    /// Payload of the committed route.
    pub fn current(router: &Router<&'static str>) -> Option<&'static str> {
        router.current_route().map(|route| *route.payload())
    }
}

pub mod guards {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use navrouter::middleware::{self, SharedMiddleware};

    /// Shared call log for guards.
    pub type CallLog = Arc<Mutex<Vec<String>>>;

    pub fn call_log() -> CallLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// A guard that records `tag` and then answers `accept`.
    pub fn recording(log: &CallLog, tag: &str, accept: bool) -> SharedMiddleware<&'static str> {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        middleware::from_fn_sync(move |_| {
            log.lock().push(tag.clone());
            Ok(accept)
        })
    }
}

pub mod temp_files {
    use std::io::Write;

    use tempfile::NamedTempFile;

    /// Write `content` to a temporary file with extension `ext`.
    pub fn create_temp_table(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("navrouter_table_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}
