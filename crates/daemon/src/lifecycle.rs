// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Runtime Orchestrator (C11, §4.11): boots every other component in
//! order, runs the host-protocol loop to completion, and tears everything
//! down cleanly on the way out.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use warden_core::clock::{Clock, SystemClock};
use warden_core::error::ErrorCode;
use warden_core::host::HostNotifier;
use warden_core::registry::{ParamSpec, SourceLocation, Tier, Tool, ToolRegistry};
use warden_core::result::ToolResult;
use warden_core::session::Session;
use warden_modules::capability::{CredentialAdapter, MemoryAdapter, NetworkAdapter};
use warden_modules::defaults::{CommandCredentialAdapter, CommandNetworkAdapter};
use warden_storage::{ConfigStore, FailureLog, StateStore, StoreError, WorkspaceRegistry};

use crate::event_bus::EventBus;
use crate::protocol::{self, StdioProtocol};
use crate::registry::{
    AutoHealEngine, DebugWrapper, HealSink, ModuleRegistrar, PersonaLoadError, PersonaLoader, RegistryInvoker,
};

/// Which modules to load at boot (§4.11 step 3 / §6.4).
#[derive(Debug, Clone)]
pub enum ModuleSelection {
    Persona(String),
    Tools(Vec<String>),
    All,
}

/// Everything the boot sequence needs, gathered from CLI flags and the
/// environment before `boot()` runs.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub project_dir: PathBuf,
    pub modules: ModuleSelection,
    pub server_name: String,
    pub bus_enabled: bool,
    pub bus_addr: SocketAddr,
}

impl Config {
    /// Resolve `state_dir` from the environment (§6.3) and bundle it with
    /// the caller-supplied project directory and CLI options.
    pub fn load(
        project_dir: PathBuf,
        modules: ModuleSelection,
        server_name: String,
        bus_enabled: bool,
        bus_addr: SocketAddr,
    ) -> Result<Self, LifecycleError> {
        Ok(Self { state_dir: crate::env::state_dir()?, project_dir, modules, server_name, bus_enabled, bus_addr })
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,
    #[error("failed to load a persisted store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to load persona {0:?} at boot")]
    Persona(#[from] PersonaLoadError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Always fails — the fallback credential adapter when `WARDEN_CREDENTIAL_CMD`
/// is unset, so the `credential_refresh` tool and C6's auth fix action
/// report an honest failure instead of silently no-oping.
struct NullCredentialAdapter;

#[async_trait]
impl CredentialAdapter for NullCredentialAdapter {
    async fn refresh(&self, _cluster: &str) -> bool {
        false
    }
}

/// Always fails — the fallback network adapter when `WARDEN_NETWORK_CMD` is unset.
struct NullNetworkAdapter;

#[async_trait]
impl NetworkAdapter for NullNetworkAdapter {
    async fn link_up(&self) -> bool {
        false
    }
}

/// The memory subsystem is explicitly out of this runtime's scope (§1
/// Non-goals); this adapter is what the protected `memory_*` tools run
/// against until a real backend is wired in by whoever embeds this crate.
struct NullMemoryAdapter;

#[async_trait]
impl MemoryAdapter for NullMemoryAdapter {
    async fn ask(&self, _query: &str) -> ToolResult {
        ToolResult::info("memory subsystem is not configured")
    }

    async fn search(&self, _query: &str, _limit: usize) -> ToolResult {
        ToolResult::info("memory subsystem is not configured")
    }

    async fn store(&self, _key: &str, _value: &str) -> ToolResult {
        ToolResult::info("memory subsystem is not configured")
    }

    async fn health(&self) -> ToolResult {
        ToolResult::warning("memory subsystem is not configured")
    }

    fn list_adapters(&self) -> Vec<String> {
        Vec::new()
    }
}

/// The names [`register_protected_tools`] always registers (§4.7: "session
/// start, persona load/list, debug, memory ask/search/store/health/list-adapters").
/// Fixed upfront so the Persona Loader can be constructed with the final
/// protected set before those tools exist (see [`Daemon::boot`]).
const PROTECTED_TOOL_NAMES: [&str; 9] = [
    "memory_ask",
    "memory_search",
    "memory_store",
    "memory_health",
    "memory_list_adapters",
    "session_start",
    "persona_load",
    "persona_list",
    "debug",
];

fn source(line_start: u32, line_end: u32) -> SourceLocation {
    SourceLocation { file: "warden-daemon/src/lifecycle.rs".to_string(), line_start, line_end }
}

fn param(name: &str, type_name: &str, required: bool, description: &str) -> ParamSpec {
    ParamSpec { name: name.to_string(), type_name: type_name.to_string(), required, description: Some(description.to_string()) }
}

/// Register every tool `scratch` collected under `names`, wrapped with debug
/// telemetry and, for anything outside the `ops` module itself, auto-heal —
/// the orchestrator's "wrap every registered tool with debug; selectively
/// wrap with auto-heal" (§4.11 step 5). `ops`'s own `credential_refresh`/
/// `link_up` tools are excluded from auto-heal to avoid a fix action
/// recursively healing itself.
fn wrap_and_register(
    registry: &mut ToolRegistry,
    debug: &Arc<DebugWrapper>,
    autoheal: &Arc<AutoHealEngine<RegistryInvoker>>,
    scratch: &ToolRegistry,
    names: Vec<String>,
) -> Vec<String> {
    for name in &names {
        if let Some(tool) = scratch.get_manifest(name) {
            let wrapped = debug.wrap(tool.clone());
            let wrapped = if tool.module == "ops" { wrapped } else { autoheal.wrap(wrapped) };
            registry.register(wrapped);
        }
    }
    names
}

/// Build the module registrars the Persona Loader resolves by name (§3
/// Module suffix rule), each closing over the capability adapters its
/// module needs and routing its output through [`wrap_and_register`].
fn install_module_registrars(
    loader: &mut PersonaLoader,
    project_dir: &std::path::Path,
    credentials: Arc<dyn CredentialAdapter>,
    network: Arc<dyn NetworkAdapter>,
    debug: Arc<DebugWrapper>,
    autoheal: Arc<AutoHealEngine<RegistryInvoker>>,
) {
    for (name, tier_fn) in [
        ("git", warden_modules::git_core::register_tools as fn(&mut ToolRegistry, PathBuf) -> Vec<String>),
        ("git_basic", warden_modules::git_basic::register_tools as fn(&mut ToolRegistry, PathBuf) -> Vec<String>),
        ("git_extra", warden_modules::git_extra::register_tools as fn(&mut ToolRegistry, PathBuf) -> Vec<String>),
    ] {
        let repo_root = project_dir.to_path_buf();
        let debug = Arc::clone(&debug);
        let autoheal = Arc::clone(&autoheal);
        loader.register_module(
            name,
            Arc::new(move |registry: &mut ToolRegistry| {
                let mut scratch = ToolRegistry::new();
                let names = tier_fn(&mut scratch, repo_root.clone());
                wrap_and_register(registry, &debug, &autoheal, &scratch, names)
            }),
        );
    }

    let debug = Arc::clone(&debug);
    let autoheal = Arc::clone(&autoheal);
    loader.register_module(
        "ops",
        Arc::new(move |registry: &mut ToolRegistry| {
            let mut scratch = ToolRegistry::new();
            let names = warden_modules::register_ops_tools(&mut scratch, Arc::clone(&credentials), Arc::clone(&network));
            wrap_and_register(registry, &debug, &autoheal, &scratch, names)
        }),
    );
}

/// Register the protected core (§4.7) directly: the memory-backed slice
/// from `warden_modules::protected`, plus the four names that need live
/// access to the Workspace Registry, Persona Loader, and Debug Wrapper and
/// so cannot live in a crate below this one.
fn register_protected_tools(
    registry: &mut ToolRegistry,
    debug: &Arc<DebugWrapper>,
    workspace_registry: &Arc<WorkspaceRegistry>,
    persona_loader: &Arc<PersonaLoader>,
    live_registry: &Arc<RwLock<ToolRegistry>>,
    notifier: Arc<dyn HostNotifier>,
    project_uri: String,
) -> Vec<String> {
    let memory_names = warden_modules::register_memory_tools(registry, Arc::new(NullMemoryAdapter));
    for name in &memory_names {
        if let Some(tool) = registry.get_live(name).cloned() {
            registry.register(debug.wrap(tool));
        }
    }
    let mut protected: Vec<String> = memory_names;

    {
        let workspace_registry = Arc::clone(workspace_registry);
        let project_uri = project_uri.clone();
        registry.register(debug.wrap(Tool {
            name: "session_start".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![param("workspace_uri", "string", false, "defaults to the configured project directory")],
            handler: Arc::new(move |args: serde_json::Value| {
                let workspace_registry = Arc::clone(&workspace_registry);
                let project_uri = project_uri.clone();
                Box::pin(async move {
                    let uri = args.get("workspace_uri").and_then(serde_json::Value::as_str).map(str::to_string).unwrap_or(project_uri);
                    let now = SystemClock.epoch_ms();
                    let id = workspace_registry.mutate_workspace(&uri, |ws| {
                        let persona = ws.persona.clone();
                        ws.add_session(Session::new(persona, now))
                    });
                    ToolResult::success(format!("session {id} started for workspace {uri:?}"))
                })
            }),
        }));
    }
    protected.push("session_start".to_string());

    {
        let persona_loader = Arc::clone(persona_loader);
        let notifier = Arc::clone(&notifier);
        registry.register(debug.wrap(Tool {
            name: "persona_load".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![param("persona", "string", true, "persona name, e.g. \"dev\"")],
            handler: Arc::new(move |args: serde_json::Value| {
                let persona_loader = Arc::clone(&persona_loader);
                let notifier = Arc::clone(&notifier);
                Box::pin(async move {
                    let Some(name) = args.get("persona").and_then(serde_json::Value::as_str) else {
                        return ToolResult::error_code("missing required field \"persona\"", ErrorCode::InvalidInput);
                    };
                    match persona_loader.switch(name, notifier.as_ref()).await {
                        Ok(outcome) if outcome.success => {
                            ToolResult::success(format!("loaded persona {name:?}: {} tools live", outcome.tool_count))
                        }
                        Ok(outcome) => ToolResult::warning(format!(
                            "persona {name:?} loaded with failed module(s): {}",
                            outcome.failed_modules.join(", ")
                        )),
                        Err(err) => ToolResult::error_code(err.to_string(), ErrorCode::NotFound),
                    }
                })
            }),
        }));
    }
    protected.push("persona_load".to_string());

    {
        let persona_loader = Arc::clone(persona_loader);
        registry.register(debug.wrap(Tool {
            name: "persona_list".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![],
            handler: Arc::new(move |_args: serde_json::Value| {
                let persona_loader = Arc::clone(&persona_loader);
                Box::pin(async move { ToolResult::success(persona_loader.list_personas().join(", ")) })
            }),
        }));
    }
    protected.push("persona_list".to_string());

    {
        let live_registry = Arc::clone(live_registry);
        let debug = Arc::clone(debug);
        registry.register(debug.wrap(Tool {
            name: "debug".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![param("name", "string", true, "tool name to inspect")],
            handler: Arc::new(move |args: serde_json::Value| {
                let live_registry = Arc::clone(&live_registry);
                let debug = Arc::clone(&debug);
                Box::pin(async move {
                    let Some(name) = args.get("name").and_then(serde_json::Value::as_str) else {
                        return ToolResult::error_code("missing required field \"name\"", ErrorCode::InvalidInput);
                    };
                    let telemetry = debug.telemetry_for(name);
                    match debug.source_text(&live_registry.read(), name) {
                        Ok(src) => ToolResult::success(format!(
                            "{name}: {} call(s), {} failure(s)\n{src}",
                            telemetry.calls, telemetry.failures
                        )),
                        Err(err) => ToolResult::error_code(err.to_string(), ErrorCode::NotFound),
                    }
                })
            }),
        }));
    }
    protected.push("debug".to_string());

    protected
}

/// Install a `tracing` subscriber writing to a daily-rolling, non-blocking
/// file under `<state_dir>/logs` (§4.11 step 1). The returned guard must be
/// held for the process lifetime or buffered log lines are dropped.
pub fn install_logging(state_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::daily(state_dir.join("logs"), "warden.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_writer(writer).with_env_filter(filter).with_ansi(false).try_init();
    guard
}

/// Every long-lived component booted by [`boot`], ready for [`Daemon::run`].
pub struct Daemon {
    pub registry: Arc<RwLock<ToolRegistry>>,
    pub persona_loader: Arc<PersonaLoader>,
    pub config_store: Arc<ConfigStore>,
    pub state_store: Arc<StateStore>,
    pub workspace_registry: Arc<WorkspaceRegistry>,
    pub failure_log: Arc<FailureLog>,
    pub debug_wrapper: Arc<DebugWrapper>,
    pub autoheal: Arc<AutoHealEngine<RegistryInvoker>>,
    /// Always constructed (§4.8's data structures are cheap and
    /// transport-independent); only its WebSocket accept loop is
    /// conditional on `--no-bus` (tracked by `config.bus_enabled`).
    pub event_bus: Arc<EventBus>,
    pub protocol: Arc<StdioProtocol<tokio::io::Stdout>>,
    pub config: Config,
}

impl Daemon {
    /// Steps 2-5 of §4.11: load the persisted stores, build a fresh Tool
    /// Registry, register the protected core, and load whatever modules
    /// `config.modules` names. Does not bind the Event Bus socket or read
    /// from stdin — that's [`Daemon::run`].
    pub async fn boot(config: Config) -> Result<Self, LifecycleError> {
        let config_store = Arc::new(ConfigStore::load(config.project_dir.join("config.json"))?);
        let state_store = Arc::new(StateStore::load(config.state_dir.join("state.json"))?);
        state_store.spawn_debounce_flusher();

        let workspace_registry =
            Arc::new(WorkspaceRegistry::new(config.state_dir.join("workspaces.json"), "developer"));
        workspace_registry.restore_if_empty()?;

        let failure_log = Arc::new(FailureLog::load(config.state_dir.join("tool_failures.yaml"))?);

        let registry = Arc::new(RwLock::new(ToolRegistry::new()));

        let credentials: Arc<dyn CredentialAdapter> = match crate::env::credential_command() {
            Some(cmd) => Arc::new(CommandCredentialAdapter::new(cmd)),
            None => Arc::new(NullCredentialAdapter),
        };
        let network: Arc<dyn NetworkAdapter> = match crate::env::network_command() {
            Some((program, args)) => Arc::new(CommandNetworkAdapter::new(program, args)),
            None => Arc::new(NullNetworkAdapter),
        };

        let debug_wrapper = Arc::new(DebugWrapper::new(config.project_dir.clone()));
        let invoker = Arc::new(RegistryInvoker::new(Arc::clone(&registry)));

        // Constructed regardless of `--no-bus` (§4.8's data structures are
        // transport-independent); only its WebSocket accept loop is
        // conditional, started in `run()`.
        let event_bus = Arc::new(EventBus::new());

        let mut autoheal_engine = AutoHealEngine::new(
            Arc::clone(&invoker),
            Arc::clone(&credentials),
            Arc::clone(&network),
            Arc::clone(&failure_log),
            "prod",
        );
        autoheal_engine.set_sink(Arc::clone(&event_bus) as Arc<dyn HealSink>);
        let autoheal = Arc::new(autoheal_engine);

        let protocol = Arc::new(StdioProtocol::new(tokio::io::stdout()));

        let project_uri = format!("file://{}", config.project_dir.display());

        // The protected set (§4.7) is exactly the names `register_protected_tools`
        // registers below: known upfront since they're all fixed string literals,
        // which lets the Persona Loader be constructed (and Arc-wrapped, so its
        // own tool handlers can close over it) before those tools exist.
        let protected: Vec<String> = PROTECTED_TOOL_NAMES.iter().map(|s| s.to_string()).collect();

        let mut persona_loader =
            PersonaLoader::new(Arc::clone(&registry), config.project_dir.join("personas"), protected);
        install_module_registrars(
            &mut persona_loader,
            &config.project_dir,
            Arc::clone(&credentials),
            Arc::clone(&network),
            Arc::clone(&debug_wrapper),
            Arc::clone(&autoheal),
        );
        let persona_loader = Arc::new(persona_loader);

        let registered = register_protected_tools(
            &mut registry.write(),
            &debug_wrapper,
            &workspace_registry,
            &persona_loader,
            &registry,
            Arc::clone(&protocol) as Arc<dyn HostNotifier>,
            project_uri.clone(),
        );
        debug_assert_eq!(
            registered,
            PROTECTED_TOOL_NAMES.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            "protected set must match the hardcoded constant"
        );

        match &config.modules {
            ModuleSelection::All => {
                for name in persona_loader.known_modules() {
                    persona_loader.load_module(&name);
                }
            }
            ModuleSelection::Tools(names) => {
                for name in names {
                    if persona_loader.load_module(name).is_none() {
                        tracing::warn!(module = %name, "requested module is not known, skipping");
                    }
                }
            }
            ModuleSelection::Persona(name) => {
                persona_loader.switch(name, protocol.as_ref()).await?;
            }
        }

        Ok(Self {
            registry,
            persona_loader,
            config_store,
            state_store,
            workspace_registry,
            failure_log,
            debug_wrapper,
            autoheal,
            event_bus,
            protocol,
            config,
        })
    }

    /// Steps 6-7 of §4.11: start the Event Bus (unless disabled) and block
    /// on the stdio host-protocol loop until the client disconnects, then
    /// shut down.
    pub async fn run(self, cancel: CancellationToken) -> std::io::Result<()> {
        let bus_task = self.config.bus_enabled.then(|| {
            let bus = Arc::clone(&self.event_bus);
            let addr = self.config.bus_addr;
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if let Err(err) = bus.serve(addr, cancel).await {
                    tracing::warn!(error = %err, "event bus stopped");
                }
            })
        });

        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        let invoker = Arc::new(RegistryInvoker::new(Arc::clone(&self.registry)));
        let skills = Arc::new(crate::skills::DaemonSkillRunner::new(
            self.config.project_dir.join("skills"),
            Arc::clone(&invoker),
            Arc::clone(&self.event_bus),
            Arc::clone(&self.autoheal),
            Arc::clone(&self.config_store),
        ));
        let result =
            protocol::serve(reader, Arc::clone(&self.protocol), Arc::clone(&self.registry), invoker, skills).await;

        cancel.cancel();
        if let Some(task) = bus_task {
            let _ = task.await;
        }
        self.shutdown();
        result
    }

    /// Drain the debounce timer, persist the workspace registry, and tell
    /// any connected bus clients the server is going away.
    pub fn shutdown(&self) {
        if let Err(err) = self.state_store.flush() {
            tracing::warn!(error = %err, "failed to flush state store on shutdown");
        }
        if let Err(err) = self.workspace_registry.save_to_disk() {
            tracing::warn!(error = %err, "failed to save workspace registry on shutdown");
        }
        self.event_bus.notify_stopping();
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
