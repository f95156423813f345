//! Lightweight read only projections of entities.
//!
//! A [`ProjectionRegistry`] holds one [`ProjectionType`] per entity, built either
//! from the columns the entity declares or from the live table. Queries through
//! [`QuickRead`] return [`Projection`]s: plain rows that read without touching
//! the entity and turn into a change tracked [`Record`] only when asked to.
//!
//! ```rust,ignore
//! use quickread::{Condition, Entity, ProjectionRegistry, QuickRead};
//!
//! #[derive(Entity)]
//! struct Widget {
//!     #[quickread(primary_key)]
//!     id: i64,
//!     name: String,
//!     price: f64,
//! }
//!
//! let mut registry = ProjectionRegistry::new();
//! registry.register_pending::<Widget>();
//! registry.materialize_all(&mut connection).await?;
//!
//! let mut widget = Widget::query_projection(&mut connection, &registry, Condition::eq("id", 1).into())
//!     .await?
//!     .expect("Widget 1 exists");
//! println!("{}", widget.get_as::<String>("name")?);
//! let record = widget.as_entity_mut()?;
//! record.price = 8.99;
//! record.save(&mut connection).await?;
//! ```
pub use quickread_core::*;
pub use quickread_macros::*;
