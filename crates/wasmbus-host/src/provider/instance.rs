//! Per-provider supervised worker.
//!
//! One [`ProviderInstance`] owns one child process. Its task loop
//! serializes everything that can happen to the provider: handle
//! commands (queries, halt), child exit, child output lines, and the
//! periodic health probe. The loop is biased toward the inbox so a halt
//! is never starved by chatty child output.
//!
//! # Start protocol
//!
//! 1. Mint the instance id.
//! 2. Register the identity in the tables (fails `AlreadyRegistered`).
//! 3. Build the host descriptor.
//! 4. Spawn the executable with the filtered environment and piped
//!    stdio.
//! 5. Write `base64(json(descriptor)) + "\n"` to the child's stdin and
//!    keep the pipe open.
//! 6. Persist claims, publish `provider_started`, record the image
//!    reference.
//! 7. Hand supervision to the instance task; first health probe after
//!    the configured initial delay, then periodically.
//!
//! A failure after a successful spawn still emits `provider_stopped`
//! and leaves no registry residue.

use crate::descriptor::HostDescriptor;
use crate::error::ProviderError;
use crate::events::EventPublisher;
use crate::lattice::SharedLattice;
use crate::provider::command::ProviderCommand;
use crate::tables::ProviderTables;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use wasmbus_events::{subject, ClaimsSummary, HealthCheck, ProviderStarted, ProviderStopped};
use wasmbus_types::{Claims, InstanceId, ProviderIdentity, DEFAULT_LINK_NAME};

/// Sentinel returned by queries against a dead instance.
pub const DEAD_SENTINEL: &str = "n/a";

/// Environment variables allowed through to the child process.
const ENV_ALLOWLIST: [&str; 2] = ["OTEL_TRACES_EXPORTER", "OTEL_EXPORTER_OTLP_ENDPOINT"];

/// Inbox depth per instance.
const COMMAND_BUFFER_SIZE: usize = 16;

/// Everything needed to start one provider.
#[derive(Debug, Clone)]
pub struct ProviderSpec {
    /// Resolved executable path.
    pub path: PathBuf,
    /// Verified claims; `claims.public_key` is the provider identity.
    pub claims: Claims,
    /// Binding name, `"default"` unless overridden.
    pub link_name: String,
    /// Capability contract the provider satisfies.
    pub contract_id: String,
    /// OCI or bindle reference the binary was resolved from, if any.
    pub image_ref: Option<String>,
    /// Opaque configuration string passed through the descriptor.
    pub config_json: Option<String>,
    /// Annotations echoed in lifecycle events.
    pub annotations: HashMap<String, String>,
}

impl ProviderSpec {
    /// Creates a spec with the default link name and empty contract.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, claims: Claims) -> Self {
        Self {
            path: path.into(),
            claims,
            link_name: DEFAULT_LINK_NAME.to_string(),
            contract_id: String::new(),
            image_ref: None,
            config_json: None,
            annotations: HashMap::new(),
        }
    }

    /// Sets the capability contract id.
    #[must_use]
    pub fn with_contract_id(mut self, contract_id: impl Into<String>) -> Self {
        self.contract_id = contract_id.into();
        self
    }

    /// Sets the link name.
    #[must_use]
    pub fn with_link_name(mut self, link_name: impl Into<String>) -> Self {
        self.link_name = link_name.into();
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Sets the opaque configuration string.
    #[must_use]
    pub fn with_config_json(mut self, config_json: impl Into<String>) -> Self {
        self.config_json = Some(config_json.into());
        self
    }

    /// Adds one annotation.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// The `(public_key, link_name)` identity this spec starts.
    #[must_use]
    pub fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::new(&self.claims.public_key, &self.link_name)
    }
}

/// Cloneable handle to a running provider instance.
///
/// All queries round-trip through the instance inbox, so they observe
/// the same total order as everything else that happens to the
/// instance. Once the instance is dead the queries return
/// [`DEAD_SENTINEL`] (or an empty map) and [`halt`](Self::halt) is a
/// no-op.
#[derive(Clone)]
pub struct ProviderHandle {
    identity: ProviderIdentity,
    contract_id: String,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl ProviderHandle {
    /// Creates a handle over an instance inbox.
    #[must_use]
    pub fn new(
        identity: ProviderIdentity,
        contract_id: impl Into<String>,
        cmd_tx: mpsc::Sender<ProviderCommand>,
    ) -> Self {
        Self {
            identity,
            contract_id: contract_id.into(),
            cmd_tx,
        }
    }

    /// The `(public_key, link_name)` identity tuple.
    #[must_use]
    pub fn identity_tuple(&self) -> (String, String) {
        (
            self.identity.public_key.clone(),
            self.identity.link_name.clone(),
        )
    }

    /// The provider identity.
    #[must_use]
    pub fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    /// The capability contract id.
    #[must_use]
    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// The per-start instance id, or [`DEAD_SENTINEL`].
    pub async fn instance_id(&self) -> String {
        self.query(|reply| ProviderCommand::InstanceId { reply }, DEAD_SENTINEL.into())
            .await
    }

    /// The start annotations, or an empty map.
    pub async fn annotations(&self) -> HashMap<String, String> {
        self.query(|reply| ProviderCommand::Annotations { reply }, HashMap::new())
            .await
    }

    /// The image reference, or [`DEAD_SENTINEL`].
    pub async fn ociref(&self) -> String {
        self.query(|reply| ProviderCommand::OciRef { reply }, DEAD_SENTINEL.into())
            .await
    }

    /// The executable path, or [`DEAD_SENTINEL`].
    pub async fn path(&self) -> String {
        self.query(|reply| ProviderCommand::Path { reply }, DEAD_SENTINEL.into())
            .await
    }

    /// Terminates the provider. Idempotent: completes only after the
    /// `provider_stopped` event has been handed to the lattice client,
    /// and is a no-op against a dead instance.
    pub async fn halt(&self) {
        let (reply, acked) = oneshot::channel();
        if self
            .cmd_tx
            .send(ProviderCommand::Halt { reply })
            .await
            .is_err()
        {
            // Instance already gone; nothing left to stop.
            return;
        }
        let _ = acked.await;
    }

    /// Returns `true` once the instance task has exited.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    async fn query<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> ProviderCommand,
        fallback: T,
    ) -> T {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(make(tx)).await.is_err() {
            return fallback;
        }
        rx.await.unwrap_or(fallback)
    }
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("identity", &self.identity.to_string())
            .field("contract_id", &self.contract_id)
            .field("dead", &self.is_dead())
            .finish()
    }
}

/// MessagePack health probe body. The responder ignores it; only the
/// arrival of any reply matters.
#[derive(Serialize)]
struct HealthProbe {
    placeholder: bool,
}

/// Supervised worker around one child process.
pub(crate) struct ProviderInstance {
    identity: ProviderIdentity,
    contract_id: String,
    instance_id: InstanceId,
    path: PathBuf,
    image_ref: Option<String>,
    annotations: HashMap<String, String>,
    /// Snapshot of the host config at start time.
    lattice_prefix: String,
    rpc_timeout: Duration,
    probe_initial: Duration,
    probe_period: Duration,
    healthy: bool,
    child: Child,
    /// Kept open for the child's lifetime; the descriptor contract
    /// closes no streams.
    _stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    stderr: Lines<BufReader<ChildStderr>>,
    cmd_rx: mpsc::Receiver<ProviderCommand>,
    tables: Arc<ProviderTables>,
    publisher: EventPublisher,
    lattice: SharedLattice,
}

impl ProviderInstance {
    /// Runs the start protocol and hands the instance to its task.
    pub(crate) async fn start(
        spec: ProviderSpec,
        tables: Arc<ProviderTables>,
        publisher: EventPublisher,
        lattice: SharedLattice,
    ) -> Result<ProviderHandle, ProviderError> {
        let identity = spec.identity();
        let options = tables.config();
        let instance_id = InstanceId::new();

        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER_SIZE);
        let handle = ProviderHandle::new(identity.clone(), &spec.contract_id, cmd_tx);

        tables.register(&identity, &spec.contract_id, instance_id, handle.clone())?;

        let descriptor = HostDescriptor::for_start(
            &options,
            &identity,
            instance_id,
            spec.config_json.clone(),
            tables.links_for(&identity.public_key, &identity.link_name),
        );

        let mut child = match spawn_child(&spec.path) {
            Ok(child) => child,
            Err(e) => {
                tables.remove(&identity);
                return Err(ProviderError::SpawnFailed {
                    identity,
                    message: e.to_string(),
                });
            }
        };

        // Pipe setup is part of the spawn; losing a pipe here fails the
        // start without a stopped event.
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.start_kill();
            let _ = child.wait().await;
            tables.remove(&identity);
            return Err(ProviderError::SpawnFailed {
                identity,
                message: "child stdio was not piped".into(),
            });
        };
        let stdout = BufReader::new(stdout).lines();
        let stderr = BufReader::new(stderr).lines();

        info!(
            provider_id = %identity.public_key,
            link_name = %identity.link_name,
            contract_id = %spec.contract_id,
            instance_id = %instance_id,
            pid = child.id(),
            path = %spec.path.display(),
            "provider spawned"
        );

        let stdin = match deliver_descriptor(&mut child, &descriptor).await {
            Ok(stdin) => stdin,
            Err(e) => {
                // Spawn succeeded, so the stopped event is still owed.
                let _ = child.start_kill();
                let _ = child.wait().await;
                tables.remove(&identity);
                publisher
                    .emit(
                        ProviderStopped::KIND,
                        &ProviderStopped {
                            public_key: identity.public_key.clone(),
                            link_name: identity.link_name.clone(),
                            contract_id: spec.contract_id.clone(),
                            instance_id: instance_id.to_string(),
                            reason: e.clone(),
                        },
                    )
                    .await;
                return Err(ProviderError::SpawnFailed {
                    identity,
                    message: e,
                });
            }
        };

        tables.put_claims(spec.claims.clone());

        publisher
            .emit(
                ProviderStarted::KIND,
                &ProviderStarted {
                    public_key: identity.public_key.clone(),
                    image_ref: spec.image_ref.clone().unwrap_or_default(),
                    link_name: identity.link_name.clone(),
                    contract_id: spec.contract_id.clone(),
                    instance_id: instance_id.to_string(),
                    annotations: spec.annotations.clone(),
                    claims: ClaimsSummary::from(&spec.claims),
                },
            )
            .await;

        if let Some(image_ref) = spec.image_ref.as_deref().filter(|r| !r.is_empty()) {
            tables.record_ref(image_ref, &identity.public_key);
        }

        let instance = Self {
            identity,
            contract_id: spec.contract_id,
            instance_id,
            path: spec.path,
            image_ref: spec.image_ref,
            annotations: spec.annotations,
            lattice_prefix: options.lattice_prefix.clone(),
            rpc_timeout: options.rpc_timeout(),
            probe_initial: Duration::from_millis(options.health_probe_initial_ms),
            probe_period: Duration::from_millis(options.health_probe_period_ms),
            healthy: false,
            child,
            _stdin: Some(stdin),
            stdout,
            stderr,
            cmd_rx,
            tables,
            publisher,
            lattice,
        };

        tokio::spawn(instance.run());

        Ok(handle)
    }

    /// The instance task loop.
    async fn run(mut self) {
        let mut probes = interval_at(Instant::now() + self.probe_initial, self.probe_period);
        probes.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut stdout_done = false;
        let mut stderr_done = false;

        loop {
            tokio::select! {
                // Inbox first: halt must not be starved by child output
                biased;

                cmd = self.cmd_rx.recv() => match cmd {
                    Some(ProviderCommand::Halt { reply }) => {
                        self.terminate("normal", true).await;
                        let _ = reply.send(());
                        break;
                    }
                    Some(ProviderCommand::InstanceId { reply }) => {
                        let _ = reply.send(self.instance_id.to_string());
                    }
                    Some(ProviderCommand::Annotations { reply }) => {
                        let _ = reply.send(self.annotations.clone());
                    }
                    Some(ProviderCommand::OciRef { reply }) => {
                        let _ = reply.send(
                            self.image_ref.clone().unwrap_or_else(|| DEAD_SENTINEL.into()),
                        );
                    }
                    Some(ProviderCommand::Path { reply }) => {
                        let _ = reply.send(self.path.display().to_string());
                    }
                    None => {
                        // Every handle dropped; treat as a halt
                        self.terminate("normal", true).await;
                        break;
                    }
                },

                status = self.child.wait() => {
                    let reason = exit_reason(status);
                    warn!(
                        provider_id = %self.identity.public_key,
                        link_name = %self.identity.link_name,
                        reason = %reason,
                        "provider child exited"
                    );
                    self.terminate(&reason, false).await;
                    break;
                }

                line = self.stdout.next_line(), if !stdout_done => match line {
                    Ok(Some(line)) => self.forward_line(&line, false),
                    _ => stdout_done = true,
                },

                line = self.stderr.next_line(), if !stderr_done => match line {
                    Ok(Some(line)) => self.forward_line(&line, true),
                    _ => stderr_done = true,
                },

                _ = probes.tick() => self.run_health_probe().await,
            }
        }
    }

    /// Tears the instance down: optional SIGKILL safety net, table
    /// removal, then exactly one `provider_stopped`.
    async fn terminate(&mut self, reason: &str, kill_child: bool) {
        if kill_child {
            // The child may be orphaned from the parent-side handle, so
            // SIGKILL is issued even when the pipe is already gone.
            if let Err(e) = self.child.start_kill() {
                debug!(
                    provider_id = %self.identity.public_key,
                    error = %e,
                    "kill after halt failed (child already gone)"
                );
            }
            let _ = self.child.wait().await;
        }

        // Tables first: registration removal happens-before the event.
        self.tables.remove(&self.identity);

        self.publisher
            .emit(
                ProviderStopped::KIND,
                &ProviderStopped {
                    public_key: self.identity.public_key.clone(),
                    link_name: self.identity.link_name.clone(),
                    contract_id: self.contract_id.clone(),
                    instance_id: self.instance_id.to_string(),
                    reason: reason.to_string(),
                },
            )
            .await;

        info!(
            provider_id = %self.identity.public_key,
            link_name = %self.identity.link_name,
            instance_id = %self.instance_id,
            reason,
            "provider stopped"
        );
    }

    /// Publishes one health probe and emits an event when `healthy`
    /// flips. A timeout is a probe failure, never an error.
    async fn run_health_probe(&mut self) {
        let subject = subject::provider_health(
            &self.lattice_prefix,
            &self.identity.public_key,
            &self.identity.link_name,
        );
        let payload = match rmp_serde::to_vec_named(&HealthProbe { placeholder: true }) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "failed to encode health probe");
                return;
            }
        };

        let passed = self
            .lattice
            .request(&subject, payload, self.rpc_timeout)
            .await
            .is_ok();

        let (healthy, edge) = health_transition(self.healthy, passed);
        self.healthy = healthy;

        if let Some(kind) = edge {
            self.publisher
                .emit(
                    kind,
                    &HealthCheck::new(&self.identity.public_key, &self.identity.link_name),
                )
                .await;
        }
    }

    /// Surfaces one child output line as a host log record.
    fn forward_line(&self, line: &str, is_stderr: bool) {
        if is_stderr {
            warn!(
                provider_id = %self.identity.public_key,
                link_name = %self.identity.link_name,
                contract_id = %self.contract_id,
                "{line}"
            );
        } else {
            info!(
                provider_id = %self.identity.public_key,
                link_name = %self.identity.link_name,
                contract_id = %self.contract_id,
                "{line}"
            );
        }
    }
}

/// Spawns the provider executable with piped stdio and the filtered
/// environment.
fn spawn_child(path: &std::path::Path) -> std::io::Result<Child> {
    let mut command = Command::new(path);
    command
        .env_clear()
        .envs(filtered_env())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command.spawn()
}

/// Writes the descriptor line to the child's stdin and returns the
/// still-open pipe.
async fn deliver_descriptor(
    child: &mut Child,
    descriptor: &HostDescriptor,
) -> Result<ChildStdin, String> {
    let line = descriptor
        .encode_line()
        .map_err(|e| format!("failed to encode host descriptor: {e}"))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| "child stdin was not piped".to_string())?;

    stdin
        .write_all(line.as_bytes())
        .await
        .map_err(|e| format!("failed to deliver host descriptor: {e}"))?;
    stdin
        .flush()
        .await
        .map_err(|e| format!("failed to deliver host descriptor: {e}"))?;

    Ok(stdin)
}

/// The parent environment restricted to the allowlist, dropping empty
/// values.
fn filtered_env() -> Vec<(String, String)> {
    ENV_ALLOWLIST
        .iter()
        .filter_map(|key| {
            std::env::var(key)
                .ok()
                .filter(|value| !value.is_empty())
                .map(|value| (key.to_string(), value))
        })
        .collect()
}

/// The `healthy` edge machine: events only on transitions.
fn health_transition(healthy: bool, passed: bool) -> (bool, Option<&'static str>) {
    match (healthy, passed) {
        (false, true) => (true, Some(HealthCheck::PASSED_KIND)),
        (true, false) => (false, Some(HealthCheck::FAILED_KIND)),
        (unchanged, _) => (unchanged, None),
    }
}

/// Maps a child exit status to the `provider_stopped` reason.
fn exit_reason(status: std::io::Result<std::process::ExitStatus>) -> String {
    match status {
        Ok(status) if status.success() => "normal".to_string(),
        Ok(status) => match status.code() {
            Some(code) => code.to_string(),
            None => {
                #[cfg(unix)]
                let reason = {
                    use std::os::unix::process::ExitStatusExt;
                    match status.signal() {
                        Some(signal) => signal_name(signal),
                        None => status.to_string(),
                    }
                };
                #[cfg(not(unix))]
                let reason = status.to_string();
                reason
            }
        },
        Err(e) => format!("wait failed: {e}"),
    }
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    match signal {
        1 => "SIGHUP".to_string(),
        2 => "SIGINT".to_string(),
        6 => "SIGABRT".to_string(),
        9 => "SIGKILL".to_string(),
        11 => "SIGSEGV".to_string(),
        15 => "SIGTERM".to_string(),
        other => format!("signal {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder_defaults() {
        let spec = ProviderSpec::new("/bin/true", Claims::new("Vxxx", "Axxx"));
        assert_eq!(spec.link_name, "default");
        assert!(spec.image_ref.is_none());
        assert_eq!(spec.identity(), ProviderIdentity::new("Vxxx", "default"));
    }

    #[test]
    fn spec_builder_overrides() {
        let spec = ProviderSpec::new("/bin/true", Claims::new("Vxxx", "Axxx"))
            .with_contract_id("wasmcloud:httpserver")
            .with_link_name("frontend")
            .with_image_ref("oci.example.com/http:0.1")
            .with_config_json(r#"{"port":8080}"#)
            .with_annotation("team", "core");

        assert_eq!(spec.contract_id, "wasmcloud:httpserver");
        assert_eq!(spec.identity().link_name, "frontend");
        assert_eq!(spec.image_ref.as_deref(), Some("oci.example.com/http:0.1"));
        assert_eq!(spec.annotations.get("team").map(String::as_str), Some("core"));
    }

    #[test]
    fn health_edges_only() {
        // false → true: passed event
        assert_eq!(
            health_transition(false, true),
            (true, Some(HealthCheck::PASSED_KIND))
        );
        // true → true: no event
        assert_eq!(health_transition(true, true), (true, None));
        // true → false: failed event
        assert_eq!(
            health_transition(true, false),
            (false, Some(HealthCheck::FAILED_KIND))
        );
        // false → false: no event
        assert_eq!(health_transition(false, false), (false, None));
    }

    #[test]
    fn health_flap_sequence_emits_three_events() {
        let outcomes = [true, true, false, false, true];
        let mut healthy = false;
        let mut events = Vec::new();

        for passed in outcomes {
            let (next, edge) = health_transition(healthy, passed);
            healthy = next;
            if let Some(kind) = edge {
                events.push(kind);
            }
        }

        assert_eq!(
            events,
            vec![
                HealthCheck::PASSED_KIND,
                HealthCheck::FAILED_KIND,
                HealthCheck::PASSED_KIND,
            ]
        );
    }

    #[test]
    fn exit_reason_mapping() {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            use std::process::ExitStatus;

            // Wait status encoding: exit code in the high byte
            let clean = ExitStatus::from_raw(0);
            assert_eq!(exit_reason(Ok(clean)), "normal");

            let code = ExitStatus::from_raw(137 << 8);
            assert_eq!(exit_reason(Ok(code)), "137");

            let killed = ExitStatus::from_raw(9);
            assert_eq!(exit_reason(Ok(killed)), "SIGKILL");
        }

        let failed = exit_reason(Err(std::io::Error::other("gone")));
        assert!(failed.contains("gone"));
    }

    #[cfg(unix)]
    #[test]
    fn signal_names() {
        assert_eq!(signal_name(9), "SIGKILL");
        assert_eq!(signal_name(15), "SIGTERM");
        assert_eq!(signal_name(42), "signal 42");
    }

    #[test]
    fn filtered_env_respects_allowlist_and_drops_empty() {
        unsafe {
            std::env::set_var("OTEL_TRACES_EXPORTER", "otlp");
            std::env::set_var("OTEL_EXPORTER_OTLP_ENDPOINT", "");
            std::env::set_var("SECRET", "hunter2");
        }

        let env = filtered_env();

        assert!(env
            .iter()
            .any(|(k, v)| k == "OTEL_TRACES_EXPORTER" && v == "otlp"));
        // Empty values are dropped
        assert!(!env.iter().any(|(k, _)| k == "OTEL_EXPORTER_OTLP_ENDPOINT"));
        // Only allowlisted keys pass
        assert!(!env.iter().any(|(k, _)| k == "SECRET"));

        unsafe {
            std::env::remove_var("OTEL_TRACES_EXPORTER");
            std::env::remove_var("OTEL_EXPORTER_OTLP_ENDPOINT");
            std::env::remove_var("SECRET");
        }
    }

    #[tokio::test]
    async fn dead_handle_returns_sentinels() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = ProviderHandle::new(
            ProviderIdentity::with_default_link("Vxxx"),
            "wasmcloud:testing",
            tx,
        );

        assert!(handle.is_dead());
        assert_eq!(handle.instance_id().await, DEAD_SENTINEL);
        assert_eq!(handle.ociref().await, DEAD_SENTINEL);
        assert_eq!(handle.path().await, DEAD_SENTINEL);
        assert!(handle.annotations().await.is_empty());

        // Idempotent no-op, must not hang
        handle.halt().await;
    }
}
