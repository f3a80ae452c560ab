/// kind cluster operations client
use std::path::Path;

use tracing::{debug, info};

use super::runner::CommandRunner;
use crate::error::{KindError, Result};

const KIND_INSTALL_URL: &str = "https://kind.sigs.k8s.io/docs/user/quick-start/#installation";

/// Client for the `kind` executable
pub struct KindClient<R> {
    runner: R,
}

impl<R: CommandRunner> KindClient<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Create a cluster, optionally from a kind configuration file
    pub async fn create_cluster(&self, name: &str, config: Option<&Path>) -> Result<()> {
        info!("Creating kind cluster {}", name);

        let mut args = vec![
            "create".to_string(),
            "cluster".to_string(),
            "--name".to_string(),
            name.to_string(),
        ];
        if let Some(config) = config {
            args.push("--config".to_string());
            args.push(config.display().to_string());
        }

        self.invoke("create cluster", &args).await?;

        info!("Cluster {} created", name);
        Ok(())
    }

    /// Fetch the raw kubeconfig YAML of a cluster
    pub async fn get_kubeconfig(&self, name: &str) -> Result<Vec<u8>> {
        debug!("Fetching kubeconfig for cluster {}", name);

        let args = [
            "get".to_string(),
            "kubeconfig".to_string(),
            "--name".to_string(),
            name.to_string(),
        ];
        self.invoke("get cluster config", &args).await
    }

    pub async fn delete_cluster(&self, name: &str) -> Result<()> {
        info!("Deleting kind cluster {}", name);

        let args = [
            "delete".to_string(),
            "cluster".to_string(),
            "--name".to_string(),
            name.to_string(),
        ];
        self.invoke("delete cluster", &args).await?;

        info!("Cluster {} deleted", name);
        Ok(())
    }

    /// Names of the clusters kind currently knows about
    pub async fn list_clusters(&self) -> Result<Vec<String>> {
        let args = ["get".to_string(), "clusters".to_string()];
        let stdout = self.invoke("list clusters", &args).await?;

        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Check that the kind executable can be run
    pub async fn check_installed(&self) -> Result<()> {
        let args = ["version".to_string()];
        match self.runner.run(&args).await {
            Ok(output) if output.success => {
                debug!("kind version: {}", output.stdout_lossy().trim());
                Ok(())
            }
            Err(err @ (KindError::Timeout { .. } | KindError::Cancelled { .. })) => Err(err),
            _ => Err(KindError::ExternalCommand {
                action: "run kind".to_string(),
                output: format!(
                    "not installed or not in PATH. Please install from {}",
                    KIND_INSTALL_URL
                ),
            }),
        }
    }

    /// Run `args` and map anything but a clean exit to `ExternalCommand`
    async fn invoke(&self, action: &str, args: &[String]) -> Result<Vec<u8>> {
        match self.runner.run(args).await {
            Ok(output) if output.success => Ok(output.stdout),
            Ok(output) => {
                debug!("{} failed, stderr: {}", action, output.stderr.trim());
                Err(KindError::ExternalCommand {
                    action: action.to_string(),
                    output: output.stdout_lossy(),
                })
            }
            Err(KindError::Io(err)) => Err(KindError::ExternalCommand {
                action: action.to_string(),
                output: err.to_string(),
            }),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::testing::FakeRunner;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_create_without_config() {
        let client = KindClient::new(FakeRunner::new().succeed(""));
        client.create_cluster("dev", None).await.unwrap();

        assert_eq!(
            client.runner().calls(),
            vec![vec!["create", "cluster", "--name", "dev"]]
        );
    }

    #[tokio::test]
    async fn test_create_appends_config() {
        let client = KindClient::new(FakeRunner::new().succeed(""));
        let config = PathBuf::from("/tmp/kind.yaml");
        client.create_cluster("dev", Some(&config)).await.unwrap();

        assert_eq!(
            client.runner().calls(),
            vec![vec![
                "create",
                "cluster",
                "--name",
                "dev",
                "--config",
                "/tmp/kind.yaml"
            ]]
        );
    }

    #[tokio::test]
    async fn test_create_failure_carries_stdout() {
        let client = KindClient::new(FakeRunner::new().fail("name already exists"));
        let err = client.create_cluster("dev", None).await.unwrap_err();

        assert!(matches!(err, KindError::ExternalCommand { .. }));
        assert!(err.to_string().contains("name already exists"));
    }

    #[tokio::test]
    async fn test_get_kubeconfig_returns_raw_bytes() {
        let client = KindClient::new(FakeRunner::new().succeed("apiVersion: v1\n"));
        let raw = client.get_kubeconfig("dev").await.unwrap();

        assert_eq!(raw, b"apiVersion: v1\n");
        assert_eq!(
            client.runner().calls(),
            vec![vec!["get", "kubeconfig", "--name", "dev"]]
        );
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let client = KindClient::new(FakeRunner::new().fail("boom"));
        let err = client.delete_cluster("dev").await.unwrap_err();

        assert_eq!(err.to_string(), "could not delete cluster: boom");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_external_command_error() {
        let client = KindClient::new(FakeRunner::new().spawn_error());
        let err = client.get_kubeconfig("dev").await.unwrap_err();

        assert!(matches!(err, KindError::ExternalCommand { .. }));
    }

    #[tokio::test]
    async fn test_check_installed_runs_version() {
        let runner = FakeRunner::new().succeed("kind v0.24.0 go1.22 linux/amd64\n");
        let client = KindClient::new(runner);
        client.check_installed().await.unwrap();

        assert_eq!(client.runner().calls(), vec![vec!["version"]]);
    }

    #[tokio::test]
    async fn test_check_installed_missing_binary() {
        let client = KindClient::new(FakeRunner::new().spawn_error());
        let err = client.check_installed().await.unwrap_err();

        assert!(err.to_string().contains("not installed or not in PATH"));
    }

    #[tokio::test]
    async fn test_list_clusters_skips_blank_lines() {
        let client = KindClient::new(FakeRunner::new().succeed("dev\n\nstaging\n"));
        let clusters = client.list_clusters().await.unwrap();

        assert_eq!(clusters, vec!["dev", "staging"]);
    }
}
