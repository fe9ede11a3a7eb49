#![allow(dead_code)]

use restbind_api::{Annotation, BeanAttributes, Qualifier, Scope, TypeMetadata, TypeName};
use restbind_core::AssemblyPass;
use std::collections::BTreeSet;

pub const PATH: &str = "javax.ws.rs.Path";
pub const PROVIDER: &str = "javax.ws.rs.ext.Provider";
pub const APPLICATION: &str = "javax.ws.rs.core.Application";
pub const APPLICATION_PATH: &str = "javax.ws.rs.ApplicationPath";
pub const MARKER: &str = "restbind.Resource";

pub fn name(s: &str) -> TypeName {
    TypeName::new(s)
}

pub fn names(items: &[&str]) -> BTreeSet<TypeName> {
    items.iter().map(|s| TypeName::new(*s)).collect()
}

pub fn resource(type_name: &str) -> TypeMetadata {
    TypeMetadata::class(type_name)
        .annotated(Annotation::new(PATH).with_member("value", format!("/{type_name}")))
}

pub fn provider(type_name: &str) -> TypeMetadata {
    TypeMetadata::class(type_name).annotated(Annotation::new(PROVIDER))
}

pub fn application_type(type_name: &str) -> TypeMetadata {
    TypeMetadata::class(type_name).with_supertype(APPLICATION)
}

pub fn bean(type_name: &str, qualifiers: &[&str]) -> BeanAttributes {
    let mut bean = BeanAttributes::new(type_name);
    for q in qualifiers {
        bean.qualifiers.insert(Qualifier::new(*q));
    }
    bean
}

pub fn application_bean(type_name: &str, qualifiers: &[&str]) -> BeanAttributes {
    bean(type_name, qualifiers)
        .with_type(APPLICATION)
        .scoped(Scope::APPLICATION)
}

/// Qualifier set from names, with the resource marker added.
pub fn marked(qualifiers: &[&str]) -> restbind_api::QualifierSet {
    qualifiers
        .iter()
        .map(|q| Qualifier::new(*q))
        .chain(std::iter::once(Qualifier::new(MARKER)))
        .collect()
}

pub fn qualifiers(items: &[&str]) -> restbind_api::QualifierSet {
    items.iter().map(|q| Qualifier::new(*q)).collect()
}

/// Run the scan and bean phases the way a host would.
pub fn scan(pass: &mut AssemblyPass, types: &[TypeMetadata], beans: Vec<BeanAttributes>) {
    for ty in types {
        pass.discover_type(ty).expect("discover should succeed");
    }
    for mut bean in beans {
        pass.observe_bean(&mut bean).expect("observe should succeed");
    }
}
