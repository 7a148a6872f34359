use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Payloads, and Actions)
// =============================================================================

/// Failures of the channel plumbing itself, independent of any domain.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("actor closed")]
    ActorClosed,
    #[error("actor dropped the response")]
    ActorDropped,
}

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Debug;
    type Patch: Send + Debug;

    type Action: Send + Debug;
    type ActionResult: Send + Debug;

    /// Domain error returned to clients. Channel failures convert into it.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the store-assigned ID and the payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, Self::Error>;

    /// Error reported when a request names an ID the store does not hold
    fn not_found(id: &Self::Id) -> Self::Error;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a custom domain-specific action.
    ///
    /// Runs inside the actor loop with exclusive access to the entity, so a
    /// check followed by a write here is atomic with respect to every other
    /// request on the same store.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

/// Predicate applied inside the actor when listing.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    name: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    /// A `buffer_size` of 0 is raised to 1.
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        if buffer_size == 0 {
            warn!(actor = name, "Actor buffer of 0 raised to 1");
        }
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            name,
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(actor = self.name))]
    pub async fn run(mut self) {
        info!("Actor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self.store.values().filter(|item| filter(*item)).cloned().collect();
                    debug!(count = items.len(), "Listed items");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.on_update(patch).map(|_| item.clone()),
                        None => Err(T::not_found(&id)),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action),
                        None => Err(T::not_found(&id)),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Shutdown => {
                    info!("Actor shutting down");
                    break;
                }
            }
        }

        info!(remaining = self.store.len(), "Actor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T, T::Error> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id.clone(), payload)?;
        item.on_create()?;
        self.store.insert(id.clone(), item.clone());
        debug!(id = %id, "Item created");
        Ok(item)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<T, T::Error> {
        let item = self.store.get(&id).ok_or_else(|| T::not_found(&id))?;
        item.on_delete()?;
        self.store.remove(&id).ok_or_else(|| T::not_found(&id))
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self, filter: impl Fn(&T) -> bool + Send + Sync + 'static) -> Result<Vec<T>, T::Error> {
        let filter: Filter<T> = Box::new(filter);
        self.request(|respond_to| ResourceRequest::List { filter, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    /// Ask the actor to stop after draining requests queued before this one.
    pub async fn shutdown(&self) -> Result<(), T::Error> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        Ok(())
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================
