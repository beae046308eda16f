//! Watch coordinator behavior with real files and a channel of events

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::sync::mpsc;
use windlass_engine::{
    apply_template, BuildOptions, ChangeEvent, DarkMode, Engine, EngineConfig, IncrementalBuild,
    PluginRegistry, TokenTable, UtilityBody, UtilityHandler, UtilityPlugin, ValueRef,
    WatchCoordinator, WatchOptions,
};

fn engine(root: &Path) -> Arc<Engine> {
    Arc::new(
        Engine::new(EngineConfig {
            root: root.to_path_buf(),
            content: vec!["./src/**/*.html".into()],
            dark_mode: DarkMode::Class,
            ..EngineConfig::default()
        })
        .unwrap(),
    )
}

fn recording_sink() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&str) -> windlass_engine::Result<()> + Send + 'static) {
    let commits = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let commits = commits.clone();
        move |css: &str| -> windlass_engine::Result<()> {
            commits.lock().unwrap().push(css.to_string());
            Ok(())
        }
    };
    (commits, sink)
}

#[tokio::test]
async fn burst_of_edits_commits_the_final_state() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let page = dir.path().join("src/page.html");
    fs::write(&page, "flex").unwrap();

    let engine = engine(dir.path());
    let build = IncrementalBuild::initial(engine.clone());
    let (commits, sink) = recording_sink();
    let (tx, rx) = mpsc::channel(64);

    let coordinator = WatchCoordinator::new(
        build,
        sink,
        WatchOptions {
            debounce: Duration::from_millis(20),
            ..WatchOptions::default()
        },
    );
    let handle = tokio::spawn(coordinator.run(rx));

    for contents in ["grid", "block p-4", "hidden md:p-2"] {
        fs::write(&page, contents).unwrap();
        tx.send(ChangeEvent::Changed(page.clone())).await.unwrap();
    }
    drop(tx);

    let stats = handle.await.unwrap();
    let commits = commits.lock().unwrap();
    let expected = engine.build(&BuildOptions::default()).stylesheet;

    assert!(stats.commits >= 1);
    assert_eq!(commits.last(), Some(&expected));
    assert!(expected.contains(".hidden"));
    assert!(!expected.contains(".flex"));
}

#[tokio::test]
async fn unchanged_output_is_not_committed() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let page = dir.path().join("src/page.html");
    fs::write(&page, "flex").unwrap();

    let build = IncrementalBuild::initial(engine(dir.path()));
    let (commits, sink) = recording_sink();
    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(WatchCoordinator::new(build, sink, WatchOptions::default()).run(rx));

    // Same tokens, different text
    fs::write(&page, "flex flex").unwrap();
    tx.send(ChangeEvent::Changed(page.clone())).await.unwrap();
    drop(tx);

    let stats = handle.await.unwrap();
    assert_eq!(stats.commits, 0);
    assert_eq!(stats.unchanged, 1);
    assert!(commits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn closing_the_channel_stops_the_coordinator() {
    let dir = TempDir::new().unwrap();
    let build = IncrementalBuild::initial(engine(dir.path()));
    let (_commits, sink) = recording_sink();
    let (tx, rx) = mpsc::channel(1);
    drop(tx);

    let stats = WatchCoordinator::new(build, sink, WatchOptions::default())
        .run(rx)
        .await;
    assert_eq!(stats, Default::default());
}

#[tokio::test]
async fn template_edits_commit_without_rule_changes() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/page.html"), "flex").unwrap();
    let template = dir.path().join("input.css");
    fs::write(&template, "@tailwind utilities;\n").unwrap();

    let build = IncrementalBuild::initial(engine(dir.path()));
    let rendered = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let rendered = rendered.clone();
        let template = template.clone();
        move |css: &str| -> windlass_engine::Result<()> {
            let text = fs::read_to_string(&template).unwrap();
            rendered.lock().unwrap().push(apply_template(&text, css));
            Ok(())
        }
    };
    let (tx, rx) = mpsc::channel(8);
    let options = WatchOptions {
        inputs: vec![template.clone()],
        ..WatchOptions::default()
    };
    let handle = tokio::spawn(WatchCoordinator::new(build, sink, options).run(rx));

    fs::write(&template, "@tailwind utilities;\nbody { margin: 0; }\n").unwrap();
    tx.send(ChangeEvent::Changed(template.clone())).await.unwrap();
    drop(tx);

    let stats = handle.await.unwrap();
    assert_eq!(stats.commits, 1);
    assert_eq!(stats.unchanged, 0);
    let rendered = rendered.lock().unwrap();
    assert_eq!(
        rendered.as_slice(),
        &[".flex {\n  display: flex;\n}\nbody { margin: 0; }\n".to_string()]
    );
}

/// Blocks the first `gate-*` interpretation until the test releases it
struct Gate {
    armed: AtomicBool,
    entered: mpsc::Sender<()>,
    release: Mutex<std_mpsc::Receiver<()>>,
}

struct GateUtility(Arc<Gate>);

impl UtilityHandler for GateUtility {
    fn matches(&self, utility: &str) -> bool {
        utility.starts_with("gate-")
    }

    fn build(&self, utility: &str, _table: &TokenTable) -> Option<UtilityBody> {
        if self.0.armed.swap(false, Ordering::SeqCst) {
            self.0.entered.blocking_send(()).unwrap();
            self.0.release.lock().unwrap().recv().unwrap();
        }
        let order = utility.strip_prefix("gate-")?;
        Some(UtilityBody::new("gate", ValueRef::Literal(order.to_string()), ["order"]))
    }
}

struct GatePlugin(Arc<Gate>);

impl UtilityPlugin for GatePlugin {
    fn id(&self) -> &str {
        "gate"
    }

    fn register(&self, _table: &TokenTable) -> Vec<Box<dyn UtilityHandler>> {
        vec![Box::new(GateUtility(self.0.clone()))]
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn events_during_a_rebuild_supersede_it() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    let first = dir.path().join("src/a.html");
    let second = dir.path().join("src/b.html");
    fs::write(&first, "flex").unwrap();

    let (entered_tx, mut entered) = mpsc::channel(1);
    let (release, release_rx) = std_mpsc::channel();
    let gate = Arc::new(Gate {
        armed: AtomicBool::new(true),
        entered: entered_tx,
        release: Mutex::new(release_rx),
    });
    let mut plugins = PluginRegistry::builtin();
    plugins.add(Box::new(GatePlugin(gate)));
    let engine = Arc::new(
        Engine::with_plugins(
            EngineConfig {
                root: dir.path().to_path_buf(),
                content: vec!["./src/**/*.html".into()],
                plugins: vec!["gate".into()],
                ..EngineConfig::default()
            },
            &plugins,
        )
        .unwrap(),
    );

    let build = IncrementalBuild::initial(engine.clone());
    let (commits, sink) = recording_sink();
    let (tx, rx) = mpsc::channel(8);
    let options = WatchOptions {
        debounce: Duration::from_millis(10),
        ..WatchOptions::default()
    };
    let handle = tokio::spawn(WatchCoordinator::new(build, sink, options).run(rx));

    fs::write(&first, "flex gate-1").unwrap();
    tx.send(ChangeEvent::Changed(first.clone())).await.unwrap();

    // The rebuild is now parked inside the gate handler
    entered.recv().await.unwrap();
    fs::write(&second, "grid").unwrap();
    tx.send(ChangeEvent::Changed(second.clone())).await.unwrap();
    // Let the coordinator observe the new event before the rebuild resumes
    tokio::time::sleep(Duration::from_millis(50)).await;
    release.send(()).unwrap();
    drop(tx);

    let stats = handle.await.unwrap();
    let expected = engine.build(&BuildOptions::default()).stylesheet;
    let commits = commits.lock().unwrap();

    assert_eq!(stats.superseded, 1);
    assert_eq!(stats.commits, 1);
    assert_eq!(commits.as_slice(), &[expected.clone()]);
    assert!(expected.contains(".gate-1"));
    assert!(expected.contains(".grid"));
}
