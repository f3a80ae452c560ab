/// Lifecycle of the `kind` resource: create, read, update and delete
pub mod schema;
pub mod state;

use tracing::{info, instrument};

use crate::error::Result;
use crate::kind::{CommandRunner, KindClient};
use crate::kubeconfig::KubeConfig;

pub use schema::kind_cluster_schema;
pub use state::ClusterState;

/// Entry points invoked by the host runtime for a `kind` resource
pub struct KindClusterResource<R> {
    client: KindClient<R>,
}

impl<R: CommandRunner> KindClusterResource<R> {
    pub fn new(client: KindClient<R>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &KindClient<R> {
        &self.client
    }

    /// Create the cluster and populate its credentials.
    ///
    /// The id is only committed once both the creation and the follow-up
    /// read have succeeded.
    #[instrument(skip_all, fields(name = %desired.name))]
    pub async fn create(&self, desired: &ClusterState) -> Result<ClusterState> {
        self.client
            .create_cluster(&desired.name, desired.config_path())
            .await?;

        let mut state = desired.clone();
        state.id = None;
        self.refresh(&mut state).await?;
        state.id = Some(desired.name.clone());

        info!("Cluster {} is ready at {}", state.name, state.host);
        Ok(state)
    }

    /// Refresh the computed fields from the cluster's current kubeconfig
    #[instrument(skip_all, fields(name = %current.name))]
    pub async fn read(&self, current: &ClusterState) -> Result<ClusterState> {
        let mut state = current.clone();
        self.refresh(&mut state).await?;
        Ok(state)
    }

    /// Nothing on a kind cluster can change in place, so this only re-reads
    pub async fn update(&self, current: &ClusterState) -> Result<ClusterState> {
        self.read(current).await
    }

    /// Delete the cluster, returning the state with its id cleared
    #[instrument(skip_all, fields(name = %current.name))]
    pub async fn delete(&self, current: &ClusterState) -> Result<ClusterState> {
        self.client.delete_cluster(&current.name).await?;

        Ok(ClusterState {
            id: None,
            ..current.clone()
        })
    }

    async fn refresh(&self, state: &mut ClusterState) -> Result<()> {
        let raw = self.client.get_kubeconfig(&state.name).await?;
        let creds = KubeConfig::from_slice(&raw)?.credentials()?;
        state.apply_credentials(creds);
        Ok(())
    }
}

/// Whether moving from `prior` to `desired` needs a destroy and re-create
pub fn requires_replacement(prior: &ClusterState, desired: &ClusterState) -> bool {
    prior.name != desired.name || prior.config != desired.config
}
