use deft_hir::framework::{ClassData, CompilationUnit, FieldData, MethodData, ParamData};
use deft_types::{ClassId, FieldId, MethodId, ParamId};

use crate::{DeclarationInjector, HostAst, OverloadPlan};

/// Simple in-memory host for unit tests and the CLI.
///
/// Ids are positional: injected methods are appended, so existing ids stay
/// valid across injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    unit: CompilationUnit,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_unit(unit: CompilationUnit) -> Self {
        Self { unit }
    }

    pub fn add_class(&mut self, class: ClassData) -> ClassId {
        let id = ClassId::new(self.unit.classes.len() as u32);
        self.unit.classes.push(class);
        id
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    pub fn into_unit(self) -> CompilationUnit {
        self.unit
    }

    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.unit
            .classes
            .iter()
            .position(|c| c.name == name)
            .map(|idx| ClassId::new(idx as u32))
    }

    /// First user-authored method called `name`.
    pub fn find_method(&self, class: ClassId, name: &str) -> Option<MethodId> {
        self.class(class)
            .methods
            .iter()
            .position(|m| m.name == name && !m.is_synthesized())
            .map(|idx| MethodId {
                class,
                index: idx as u32,
            })
    }

    pub fn find_param(&self, method: MethodId, name: &str) -> Option<ParamId> {
        self.method(method)
            .params
            .iter()
            .position(|p| p.name == name)
            .map(|idx| ParamId {
                method,
                index: idx as u32,
            })
    }

    pub fn synthesized_methods(&self, class: ClassId) -> Vec<&MethodData> {
        self.class(class).synthesized_methods().collect()
    }

    fn class_mut(&mut self, class: ClassId) -> &mut ClassData {
        self.unit
            .classes
            .get_mut(class.to_raw() as usize)
            .expect("unknown ClassId passed to MemoryHost")
    }
}

impl HostAst for MemoryHost {
    fn classes(&self) -> Vec<ClassId> {
        (0..self.unit.classes.len() as u32).map(ClassId::new).collect()
    }

    fn class(&self, class: ClassId) -> &ClassData {
        self.unit
            .classes
            .get(class.to_raw() as usize)
            .expect("unknown ClassId passed to host.class()")
    }

    fn field(&self, field: FieldId) -> &FieldData {
        self.class(field.class)
            .fields
            .get(field.index as usize)
            .expect("unknown FieldId passed to host.field()")
    }

    fn method(&self, method: MethodId) -> &MethodData {
        self.class(method.class)
            .methods
            .get(method.index as usize)
            .expect("unknown MethodId passed to host.method()")
    }

    fn param(&self, param: ParamId) -> &ParamData {
        self.method(param.method)
            .params
            .get(param.index as usize)
            .expect("unknown ParamId passed to host.param()")
    }

    fn fields_of(&self, class: ClassId) -> Vec<FieldId> {
        (0..self.class(class).fields.len() as u32)
            .map(|index| FieldId { class, index })
            .collect()
    }

    fn methods_of(&self, class: ClassId) -> Vec<MethodId> {
        (0..self.class(class).methods.len() as u32)
            .map(|index| MethodId { class, index })
            .collect()
    }

    fn params_of(&self, method: MethodId) -> Vec<ParamId> {
        (0..self.method(method).params.len() as u32)
            .map(|index| ParamId { method, index })
            .collect()
    }

    fn enclosing_method(&self, param: ParamId) -> MethodId {
        param.method
    }

    fn enclosing_class(&self, method: MethodId) -> ClassId {
        method.class
    }
}

impl DeclarationInjector for MemoryHost {
    fn inject_method(&mut self, class: ClassId, plan: OverloadPlan) -> MethodId {
        let methods = &mut self.class_mut(class).methods;
        methods.push(plan.into_method());
        MethodId {
            class,
            index: (methods.len() - 1) as u32,
        }
    }
}
