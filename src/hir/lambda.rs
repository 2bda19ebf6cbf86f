//! Lambda target typing.
//!
//! A lambda has no type of its own. Its type is the functional interface
//! the context expects: the parameter type of the chosen overload when the
//! lambda is a call argument, else the declared type of the variable,
//! assignment target, return value or cast it flows into. The declaration
//! of a lambda node is the interface's single abstract method.
//!
//! Overload rating only keeps candidates whose parameter at each lambda
//! position is a functional interface of the lambda's arity, so the
//! chosen overload always has a usable target.

use super::ids::DeclId;
use super::semantics::Semantics;
use crate::syntax::{NodeId, NodeKind};

impl Semantics<'_> {
    /// Target interface type and functional method of a lambda.
    pub(crate) fn lambda_target(&self, lambda: NodeId) -> Option<(DeclId, DeclId)> {
        let NodeKind::Lambda { params, .. } = self.kind(lambda) else {
            return None;
        };
        let arity = params.len();
        let parent = self.tree().parent(lambda)?;
        match self.kind(parent) {
            NodeKind::MethodCall { args, .. } => {
                let index = args.iter().position(|&a| a == lambda)?;
                let method = self.resolve_decl(parent)?;
                let (_, receiver) = self.call_candidates(parent);
                let (arg_types, explicit) = self.call_parts(parent)?;
                self.functional_param(method, receiver, &arg_types, &explicit, index, arity)
            }
            NodeKind::New { args, .. } => {
                let index = args.iter().position(|&a| a == lambda)?;
                let ctor = self.resolve_decl(parent)?;
                let (class_type, arg_types, implicit) = self.new_site(parent)?;
                self.functional_param(ctor, Some(class_type), &arg_types, &[], implicit + index, arity)
            }
            _ => {
                let target = self.expected_type(lambda)?;
                let method = self.functional_with_arity(target, arity)?;
                Some((target, method))
            }
        }
    }

    fn functional_with_arity(&self, ty: DeclId, arity: usize) -> Option<DeclId> {
        let r = self.resolver();
        let method = r.functional_method(ty)?;
        (r.decl(method).as_method()?.params.len() == arity).then_some(method)
    }

    /// Positions and arities of the lambdas among call arguments.
    pub(crate) fn lambda_args(&self, args: &[NodeId]) -> Vec<(usize, usize)> {
        args.iter()
            .enumerate()
            .filter_map(|(i, &a)| match self.kind(a) {
                NodeKind::Lambda { params, .. } => Some((i, params.len())),
                _ => None,
            })
            .collect()
    }

    /// Functional interface and method `candidate` accepts at parameter
    /// `index` for a lambda with `arity` parameters.
    fn functional_param(
        &self,
        candidate: DeclId,
        receiver: Option<DeclId>,
        args: &[Option<DeclId>],
        explicit: &[DeclId],
        index: usize,
        arity: usize,
    ) -> Option<(DeclId, DeclId)> {
        let r = self.resolver();
        let method_args = r.method_type_args(candidate, args, explicit);
        let (params, varargs) = r.instantiated_params(candidate, receiver, &method_args);
        let param = if varargs && index + 1 >= params.len() {
            r.decl((*params.last()?)?).array_element()?
        } else {
            (*params.get(index)?)?
        };
        let method = self.functional_with_arity(param, arity)?;
        Some((param, method))
    }

    /// Whether `candidate` has a fitting functional parameter for every
    /// lambda in `lambdas`, whose positions are shifted by `offset`.
    pub(crate) fn accepts_lambdas(
        &self,
        candidate: DeclId,
        receiver: Option<DeclId>,
        args: &[Option<DeclId>],
        explicit: &[DeclId],
        lambdas: &[(usize, usize)],
        offset: usize,
    ) -> bool {
        lambdas.iter().all(|&(index, arity)| {
            self.functional_param(candidate, receiver, args, explicit, index + offset, arity)
                .is_some()
        })
    }

    /// Type of an implicitly typed lambda parameter: the functional method's
    /// parameter type, seen through the target interface type.
    pub(crate) fn lambda_param_type(&self, param: NodeId) -> Option<DeclId> {
        let lambda = self.tree().parent(param)?;
        let NodeKind::Lambda { params, .. } = self.kind(lambda) else {
            return None;
        };
        let index = params.iter().position(|&p| p == param)?;
        let r = self.resolver();
        let method = self.resolve_decl(lambda)?;
        let iface = self.resolve_eval_type(lambda)?;
        let declared = (*r.decl(method).as_method()?.params.get(index)?)?;
        Some(r.substitute(declared, iface))
    }

    /// Return type the lambda body must produce.
    pub(crate) fn lambda_return_type(&self, lambda: NodeId) -> Option<DeclId> {
        let r = self.resolver();
        let method = self.resolve_decl(lambda)?;
        let iface = self.resolve_eval_type(lambda)?;
        let ret = r.decl(method).as_method()?.ret?;
        Some(r.substitute(ret, iface))
    }
}
