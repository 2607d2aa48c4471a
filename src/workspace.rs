// Copyright 2025 Cowboy AI, LLC.

//! Editing workspace
//!
//! [`CategoryWorkspace`] is the single entry point a user interface talks
//! to. It owns the transaction manager, one repository per entity type and
//! the projection cache, and keeps the cache in step with every commit.
//!
//! ```
//! use codices::{CategoryWorkspace, ViewMode, ViewScope};
//!
//! let mut workspace = CategoryWorkspace::in_memory();
//! let set = workspace.create_category("Set", "sets and functions").unwrap();
//! let a = workspace.create_object("A", set, "").unwrap();
//! let b = workspace.create_object("B", set, "").unwrap();
//! workspace.create_morphism("f", a, b, set, "").unwrap();
//!
//! let view = workspace.get_visualization_data(ViewScope::Category(set), ViewMode::Standard);
//! assert_eq!(view.node_labels(), vec!["A", "B"]);
//! assert_eq!(view.edge_labels(), vec!["f", "id_A", "id_B"]);
//! ```

use tracing::info;

use crate::config::WorkspaceConfig;
use crate::errors::CategoryResult;
use crate::identifiers::TransactionId;
use crate::model::{
    Category, CategoryId, Datatype, DatatypeId, Functor, FunctorId, Morphism, MorphismId,
    NaturalTransformation, NaturalTransformationId, Object, ObjectId,
};
use crate::projection::{
    build_tracked, CacheStats, NaturalitySquare, ProjectionCache, ViewKey, ViewMode, ViewModel,
    ViewScope,
};
use crate::repository::{
    self, CategoryRepository, DatatypeRepository, EntityPatch, EntityRepository,
    FunctorRepository, MappingEntry, MorphismPatch, MorphismRepository,
    NaturalTransformationRepository, NewCategory, NewDatatype, NewFunctor, NewMorphism,
    NewNaturalTransformation, NewObject, ObjectRepository, PropertyEntry,
};
use crate::store::{ChangeSet, GraphStatistics, GraphStore, Snapshot};
use crate::transaction::{StagedOperation, TransactionManager, TransactionState, WriteBatch};
use crate::validation::{self, LawCheck};

/// Transactional editing session over one category graph
#[derive(Debug)]
pub struct CategoryWorkspace {
    tx: TransactionManager,
    cache: ProjectionCache,
    objects: ObjectRepository,
}

impl CategoryWorkspace {
    /// Open the store described by `config`, loading any persisted graph
    pub fn new(config: WorkspaceConfig) -> CategoryResult<Self> {
        let store = GraphStore::open(config.storage.open())?;
        Ok(Self::with_store(store, &config))
    }

    /// Workspace over an already opened store
    pub fn with_store(store: GraphStore, config: &WorkspaceConfig) -> Self {
        info!(
            cache_capacity = config.cache_capacity.get(),
            identity_prefix = %config.identity_prefix,
            "Opened category workspace"
        );
        Self {
            tx: TransactionManager::new(store),
            cache: ProjectionCache::new(config.cache_capacity),
            objects: ObjectRepository::new(config.identity_prefix.clone()),
        }
    }

    /// In-memory workspace with the default configuration
    pub fn in_memory() -> Self {
        Self::with_store(GraphStore::in_memory(), &WorkspaceConfig::default())
    }

    /// Current view: staged rows over committed rows
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.tx.snapshot()
    }

    /// Committed rows only
    pub fn committed(&self) -> Snapshot<'_> {
        self.tx.committed()
    }

    fn run<T, F>(&mut self, op: F) -> CategoryResult<T>
    where
        F: FnOnce(&mut WriteBatch<'_>) -> CategoryResult<T>,
    {
        let (value, changes) = self.tx.execute(op)?;
        self.cache.invalidate(&changes);
        Ok(value)
    }

    // Transactions

    /// Start staging changes
    pub fn begin(&mut self) -> CategoryResult<TransactionId> {
        self.tx.begin()
    }

    /// Apply every staged change; cached views the changes touch are evicted
    pub fn commit(&mut self) -> CategoryResult<ChangeSet> {
        let changes = self.tx.commit()?;
        self.cache.invalidate(&changes);
        Ok(changes)
    }

    /// Drop every staged operation, returning how many there were
    pub fn rollback(&mut self) -> CategoryResult<usize> {
        self.tx.rollback()
    }

    /// Reverse the newest staged operation, cascaded rows included
    pub fn undo_last(&mut self) -> CategoryResult<Option<StagedOperation>> {
        self.tx.undo_last()
    }

    /// Staged operations, oldest first
    pub fn pending_changes(&self) -> &[StagedOperation] {
        self.tx.pending_changes()
    }

    /// Idle or Active
    pub fn transaction_state(&self) -> TransactionState {
        self.tx.state()
    }

    /// Id of the active transaction
    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.tx.transaction_id()
    }

    // Categories

    /// Create a category; names are unique across the workspace
    pub fn create_category(&mut self, name: &str, description: &str) -> CategoryResult<CategoryId> {
        let draft = NewCategory {
            name: name.to_string(),
            description: description.to_string(),
        };
        self.run(|batch| CategoryRepository.create(batch, draft))
    }

    /// Fetch a category
    pub fn get_category(&self, id: CategoryId) -> CategoryResult<Category> {
        CategoryRepository.get(&self.snapshot(), id)
    }

    /// Every category, in creation order
    pub fn list_categories(&self) -> Vec<Category> {
        CategoryRepository.list(&self.snapshot(), ())
    }

    /// Category with exactly this name
    pub fn category_by_name(&self, name: &str) -> Option<Category> {
        self.snapshot().category_by_name(name).cloned()
    }

    /// Rename or redescribe a category
    pub fn update_category(&mut self, id: CategoryId, patch: EntityPatch) -> CategoryResult<Category> {
        self.run(|batch| CategoryRepository.update(batch, id, patch))
    }

    /// Delete a category with its contents and the functors typed on it
    pub fn delete_category(&mut self, id: CategoryId) -> CategoryResult<()> {
        self.run(|batch| CategoryRepository.delete(batch, id))
    }

    // Objects

    /// Create an object and its identity morphism
    pub fn create_object(
        &mut self,
        name: &str,
        category_id: CategoryId,
        description: &str,
    ) -> CategoryResult<ObjectId> {
        let draft = NewObject {
            category_id,
            name: name.to_string(),
            description: description.to_string(),
        };
        let objects = &self.objects;
        let (id, changes) = self.tx.execute(|batch| objects.create(batch, draft))?;
        self.cache.invalidate(&changes);
        Ok(id)
    }

    /// Fetch an object
    pub fn get_object(&self, id: ObjectId) -> CategoryResult<Object> {
        self.objects.get(&self.snapshot(), id)
    }

    /// Objects of a category, in creation order
    pub fn list_objects(&self, category_id: CategoryId) -> Vec<Object> {
        self.objects.list(&self.snapshot(), category_id)
    }

    /// Object of a category with exactly this name
    pub fn object_by_name(&self, category_id: CategoryId, name: &str) -> Option<Object> {
        self.snapshot().object_by_name(category_id, name).cloned()
    }

    /// Rename or redescribe an object; a rename carries the identity morphism along
    pub fn update_object(&mut self, id: ObjectId, patch: EntityPatch) -> CategoryResult<Object> {
        let objects = &self.objects;
        let (object, changes) = self.tx.execute(|batch| objects.update(batch, id, patch))?;
        self.cache.invalidate(&changes);
        Ok(object)
    }

    /// Delete an object, its identity and every morphism touching it
    pub fn delete_object(&mut self, id: ObjectId) -> CategoryResult<()> {
        let objects = &self.objects;
        let ((), changes) = self.tx.execute(|batch| objects.delete(batch, id))?;
        self.cache.invalidate(&changes);
        Ok(())
    }

    // Morphisms

    /// Create a morphism between two objects of `category_id`
    pub fn create_morphism(
        &mut self,
        name: &str,
        source_id: ObjectId,
        target_id: ObjectId,
        category_id: CategoryId,
        description: &str,
    ) -> CategoryResult<MorphismId> {
        let draft = NewMorphism {
            category_id,
            name: name.to_string(),
            source_id,
            target_id,
            description: description.to_string(),
        };
        self.run(|batch| MorphismRepository.create(batch, draft))
    }

    /// Fetch a morphism
    pub fn get_morphism(&self, id: MorphismId) -> CategoryResult<Morphism> {
        MorphismRepository.get(&self.snapshot(), id)
    }

    /// Morphisms of a category, identities included, in creation order
    pub fn list_morphisms(&self, category_id: CategoryId) -> Vec<Morphism> {
        MorphismRepository.list(&self.snapshot(), category_id)
    }

    /// Update a user morphism
    pub fn update_morphism(&mut self, id: MorphismId, patch: MorphismPatch) -> CategoryResult<Morphism> {
        self.run(|batch| MorphismRepository.update(batch, id, patch))
    }

    /// Delete a user morphism
    pub fn delete_morphism(&mut self, id: MorphismId) -> CategoryResult<()> {
        self.run(|batch| MorphismRepository.delete(batch, id))
    }

    // Functors

    /// Create a functor between two categories
    pub fn create_functor(
        &mut self,
        name: &str,
        source_category_id: CategoryId,
        target_category_id: CategoryId,
        description: &str,
    ) -> CategoryResult<FunctorId> {
        let draft = NewFunctor {
            source_category_id,
            target_category_id,
            name: name.to_string(),
            description: description.to_string(),
        };
        self.run(|batch| FunctorRepository.create(batch, draft))
    }

    /// Fetch a functor
    pub fn get_functor(&self, id: FunctorId) -> CategoryResult<Functor> {
        FunctorRepository.get(&self.snapshot(), id)
    }

    /// Every functor, in creation order
    pub fn list_functors(&self) -> Vec<Functor> {
        FunctorRepository.list(&self.snapshot(), ())
    }

    /// Rename or redescribe a functor
    pub fn update_functor(&mut self, id: FunctorId, patch: EntityPatch) -> CategoryResult<Functor> {
        self.run(|batch| FunctorRepository.update(batch, id, patch))
    }

    /// Delete a functor, its maps and the transformations typed on it
    pub fn delete_functor(&mut self, id: FunctorId) -> CategoryResult<()> {
        self.run(|batch| FunctorRepository.delete(batch, id))
    }

    /// Map `source` (in the source category) to `target` (in the target category)
    pub fn add_functor_object_mapping(
        &mut self,
        functor_id: FunctorId,
        source: ObjectId,
        target: ObjectId,
    ) -> CategoryResult<()> {
        self.run(|batch| repository::add_functor_object_mapping(batch, functor_id, source, target))
    }

    /// Map a source-category morphism to a target-category morphism
    pub fn add_functor_morphism_mapping(
        &mut self,
        functor_id: FunctorId,
        source: MorphismId,
        target: MorphismId,
    ) -> CategoryResult<()> {
        self.run(|batch| repository::add_functor_morphism_mapping(batch, functor_id, source, target))
    }

    /// Remove the object-map entry for `source`
    pub fn remove_functor_object_mapping(&mut self, functor_id: FunctorId, source: ObjectId) -> CategoryResult<()> {
        self.run(|batch| repository::remove_functor_object_mapping(batch, functor_id, source))
    }

    /// Remove the morphism-map entry for `source`
    pub fn remove_functor_morphism_mapping(
        &mut self,
        functor_id: FunctorId,
        source: MorphismId,
    ) -> CategoryResult<()> {
        self.run(|batch| repository::remove_functor_morphism_mapping(batch, functor_id, source))
    }

    /// Object-map of a functor
    pub fn functor_object_mappings(&self, functor_id: FunctorId) -> CategoryResult<Vec<MappingEntry>> {
        repository::functor_object_mappings(&self.snapshot(), functor_id)
    }

    /// Morphism-map of a functor
    pub fn functor_morphism_mappings(&self, functor_id: FunctorId) -> CategoryResult<Vec<MappingEntry>> {
        repository::functor_morphism_mappings(&self.snapshot(), functor_id)
    }

    // Natural transformations

    /// Create a natural transformation between two parallel functors
    pub fn create_natural_transformation(
        &mut self,
        name: &str,
        source_functor_id: FunctorId,
        target_functor_id: FunctorId,
        description: &str,
    ) -> CategoryResult<NaturalTransformationId> {
        let draft = NewNaturalTransformation {
            source_functor_id,
            target_functor_id,
            name: name.to_string(),
            description: description.to_string(),
        };
        self.run(|batch| NaturalTransformationRepository.create(batch, draft))
    }

    /// Fetch a natural transformation
    pub fn get_natural_transformation(&self, id: NaturalTransformationId) -> CategoryResult<NaturalTransformation> {
        NaturalTransformationRepository.get(&self.snapshot(), id)
    }

    /// Every natural transformation, in creation order
    pub fn list_natural_transformations(&self) -> Vec<NaturalTransformation> {
        NaturalTransformationRepository.list(&self.snapshot(), ())
    }

    /// Rename or redescribe a natural transformation
    pub fn update_natural_transformation(
        &mut self,
        id: NaturalTransformationId,
        patch: EntityPatch,
    ) -> CategoryResult<NaturalTransformation> {
        self.run(|batch| NaturalTransformationRepository.update(batch, id, patch))
    }

    /// Delete a natural transformation and its components
    pub fn delete_natural_transformation(&mut self, id: NaturalTransformationId) -> CategoryResult<()> {
        self.run(|batch| NaturalTransformationRepository.delete(batch, id))
    }

    /// Set the component at `object` to `component`
    pub fn add_nt_component(
        &mut self,
        nt_id: NaturalTransformationId,
        object: ObjectId,
        component: MorphismId,
    ) -> CategoryResult<()> {
        self.run(|batch| repository::add_nt_component(batch, nt_id, object, component))
    }

    /// Remove the component at `object`
    pub fn remove_nt_component(&mut self, nt_id: NaturalTransformationId, object: ObjectId) -> CategoryResult<()> {
        self.run(|batch| repository::remove_nt_component(batch, nt_id, object))
    }

    /// Components of a natural transformation
    pub fn nt_components(&self, nt_id: NaturalTransformationId) -> CategoryResult<Vec<MappingEntry>> {
        repository::nt_components(&self.snapshot(), nt_id)
    }

    // Datatypes and properties

    /// Create a datatype
    pub fn create_datatype(&mut self, literal: &str, description: &str) -> CategoryResult<DatatypeId> {
        let draft = NewDatatype {
            literal: literal.to_string(),
            description: description.to_string(),
        };
        self.run(|batch| DatatypeRepository.create(batch, draft))
    }

    /// Every datatype, in creation order
    pub fn list_datatypes(&self) -> Vec<Datatype> {
        DatatypeRepository.list(&self.snapshot(), ())
    }

    /// Change a datatype's literal or description
    pub fn update_datatype(&mut self, id: DatatypeId, patch: EntityPatch) -> CategoryResult<Datatype> {
        self.run(|batch| DatatypeRepository.update(batch, id, patch))
    }

    /// Delete a datatype and the properties using it
    pub fn delete_datatype(&mut self, id: DatatypeId) -> CategoryResult<()> {
        self.run(|batch| DatatypeRepository.delete(batch, id))
    }

    /// Attach `datatype` to `object` under `field_name`
    pub fn set_property(&mut self, object: ObjectId, field_name: &str, datatype: DatatypeId) -> CategoryResult<()> {
        self.run(|batch| repository::set_property(batch, object, field_name, datatype))
    }

    /// Detach the property named `field_name`
    pub fn remove_property(&mut self, object: ObjectId, field_name: &str) -> CategoryResult<()> {
        self.run(|batch| repository::remove_property(batch, object, field_name))
    }

    /// Properties of an object, by datatype id
    pub fn properties_of(&self, object: ObjectId) -> CategoryResult<Vec<PropertyEntry>> {
        repository::properties_of(&self.snapshot(), object)
    }

    // Validation

    /// Endpoint and identity findings for a category
    pub fn validate_category_structure(&self, id: CategoryId) -> Vec<String> {
        validation::validate_category_structure(&self.snapshot(), id)
    }

    /// Typing findings for a functor's maps
    pub fn validate_functor_structure(&self, id: FunctorId) -> Vec<String> {
        validation::validate_functor_structure(&self.snapshot(), id)
    }

    /// Best-effort functor law checks
    pub fn validate_functor_laws(&self, id: FunctorId) -> Vec<LawCheck> {
        validation::validate_functor_laws(&self.snapshot(), id)
    }

    /// Typing findings for a natural transformation's components
    pub fn validate_nt_structure(&self, id: NaturalTransformationId) -> Vec<String> {
        validation::validate_nt_structure(&self.snapshot(), id)
    }

    /// One naturality square check per source-category morphism
    pub fn validate_naturality(&self, id: NaturalTransformationId) -> Vec<LawCheck> {
        validation::validate_naturality(&self.snapshot(), id)
    }

    // Projections

    /// Entity counts of the current snapshot
    pub fn statistics(&self) -> GraphStatistics {
        self.snapshot().statistics()
    }

    /// View of `scope` in `mode`
    ///
    /// While Idle the view is served from and stored in the projection
    /// cache. While a transaction is active views are built over the staged
    /// snapshot and never cached.
    pub fn get_visualization_data(&mut self, scope: ViewScope, mode: ViewMode) -> ViewModel {
        self.visualize(ViewKey::new(scope, mode))
    }

    /// `nt-detail` view of `scope` with a naturality square drawn over it
    pub fn get_naturality_view(&mut self, scope: ViewScope, square: NaturalitySquare) -> ViewModel {
        self.visualize(ViewKey::new(scope, ViewMode::NtDetail).with_square(Some(square)))
    }

    fn visualize(&mut self, key: ViewKey) -> ViewModel {
        let snapshot = self.tx.snapshot();
        if snapshot.is_staged() {
            return build_tracked(&snapshot, key.scope, key.mode, key.square).0;
        }
        if let Some(view) = self.cache.get(&key) {
            return view.clone();
        }
        let (view, deps) = build_tracked(&snapshot, key.scope, key.mode, key.square);
        if let Some(deps) = deps {
            self.cache.insert(key, view.clone(), deps);
        }
        view
    }

    /// Projection cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of cached views
    pub fn cached_views(&self) -> usize {
        self.cache.len()
    }
}

impl Default for CategoryWorkspace {
    fn default() -> Self {
        Self::in_memory()
    }
}
