//! Template registry for custom dialogs
//!
//! Maps a view-model type to a factory that builds the visual displaying it.
//! The registry is a cheap cloneable handle so the application can keep
//! registering templates after the manager has been created.

use super::{host::DialogViewModel, types::VisualId};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A visual instantiated from a template.
///
/// Clones refer to the same visual; compare with [`VisualHandle::id`].
#[derive(Clone)]
pub struct VisualHandle {
    id: VisualId,
    template: &'static str,
    content: Arc<dyn Any + Send + Sync>,
}

impl VisualHandle {
    pub fn new<T: Any + Send + Sync>(template: &'static str, content: T) -> Self {
        Self {
            id: VisualId::new(),
            template,
            content: Arc::new(content),
        }
    }

    pub fn id(&self) -> VisualId {
        self.id
    }

    /// Name of the view-model type the template was registered for
    pub fn template(&self) -> &'static str {
        self.template
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.content.downcast_ref::<T>()
    }
}

impl fmt::Debug for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualHandle")
            .field("id", &self.id)
            .field("template", &self.template)
            .finish()
    }
}

type Factory = Arc<dyn Fn() -> VisualHandle + Send + Sync>;

#[derive(Clone)]
struct Template {
    type_name: &'static str,
    factory: Factory,
}

/// Explicit view-model type to visual factory mapping
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    templates: Arc<RwLock<HashMap<TypeId, Template>>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the template for view-model type `V`, replacing any
    /// previous registration
    pub async fn register<V, T, F>(&self, factory: F)
    where
        V: DialogViewModel,
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<V>();
        let template = Template {
            type_name,
            factory: Arc::new(move || VisualHandle::new(type_name, factory())),
        };

        let previous = self
            .templates
            .write()
            .await
            .insert(TypeId::of::<V>(), template);
        if previous.is_some() {
            debug!("Replaced dialog template for {}", type_name);
        } else {
            debug!("Registered dialog template for {}", type_name);
        }
    }

    /// Remove the template for `V`. Returns whether one was registered.
    pub async fn unregister<V: DialogViewModel>(&self) -> bool {
        self.templates
            .write()
            .await
            .remove(&TypeId::of::<V>())
            .is_some()
    }

    /// Build a fresh visual for the given view-model type
    pub async fn resolve_template(&self, view_model_type: TypeId) -> Option<VisualHandle> {
        let template = self.templates.read().await.get(&view_model_type).cloned()?;
        debug!("Instantiating dialog template for {}", template.type_name);
        Some((template.factory)())
    }

    pub async fn contains<V: DialogViewModel>(&self) -> bool {
        self.templates.read().await.contains_key(&TypeId::of::<V>())
    }

    pub async fn len(&self) -> usize {
        self.templates.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.templates.read().await.is_empty()
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry").finish_non_exhaustive()
    }
}
