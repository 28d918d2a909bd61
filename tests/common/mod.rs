//! Shared fixture-building helpers for the integration tests. Not a test
//! module itself — each test file does `mod common;`.

use archlens::model::{AnnotationRef, Constructor, Field, JavaType, Method, Modifier, Parameter, TypeForm, TypeRef};

pub struct TB(JavaType);

impl TB {
    pub fn new(qualified_name: &str, form: TypeForm) -> Self {
        let simple_name = qualified_name.rsplit('.').next().unwrap_or(qualified_name).to_string();
        let package = qualified_name
            .rsplit_once('.')
            .map(|(p, _)| p.to_string())
            .unwrap_or_default();
        TB(JavaType {
            qualified_name: qualified_name.to_string(),
            simple_name,
            package,
            form,
            modifiers: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            location: None,
            documentation: None,
        })
    }

    pub fn annotated(mut self, marker: &str) -> Self {
        self.0.annotations.push(AnnotationRef::marker(marker));
        self
    }

    pub fn implementing(mut self, iface: &str) -> Self {
        self.0.interfaces.push(TypeRef::simple(iface));
        self
    }

    pub fn field(mut self, name: &str, type_name: &str, is_final: bool) -> Self {
        let mut modifiers = Vec::new();
        if is_final {
            modifiers.push(Modifier::Final);
        }
        self.0.fields.push(Field {
            name: name.to_string(),
            type_ref: TypeRef::simple(type_name),
            modifiers,
            annotations: Vec::new(),
        });
        self
    }

    pub fn field_annotated(mut self, name: &str, type_name: &str, marker: &str) -> Self {
        self.0.fields.push(Field {
            name: name.to_string(),
            type_ref: TypeRef::simple(type_name),
            modifiers: Vec::new(),
            annotations: vec![AnnotationRef::marker(marker)],
        });
        self
    }

    pub fn method(mut self, name: &str, params: &[(&str, &str)], return_type: &str) -> Self {
        self.0.methods.push(Method {
            name: name.to_string(),
            parameters: params
                .iter()
                .map(|(n, t)| Parameter {
                    name: n.to_string(),
                    type_ref: TypeRef::simple(*t),
                    annotations: Vec::new(),
                })
                .collect(),
            return_type: TypeRef::simple(return_type),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            complexity: Some(1),
        });
        self
    }

    pub fn constructor(mut self, params: &[(&str, &str)]) -> Self {
        self.0.constructors.push(Constructor {
            parameters: params
                .iter()
                .map(|(n, t)| Parameter {
                    name: n.to_string(),
                    type_ref: TypeRef::simple(*t),
                    annotations: Vec::new(),
                })
                .collect(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
        });
        self
    }

    pub fn build(self) -> JavaType {
        self.0
    }
}

pub fn config(base_package: &str) -> archlens::config::Config {
    let mut cfg = archlens::config::Config::new(base_package);
    cfg.source_roots = vec![std::path::PathBuf::from(".")];
    cfg
}
