//! Type alias resolution.
//!
//! # Scoping
//!
//! `typealias A = T in body` makes `A` visible while resolving annotations
//! inside `body` only. Scopes form a stack (`AliasScope`); the innermost
//! definition of a name wins. All definitions of one group are visible to
//! each other, which is how mutually recursive aliases are written.
//!
//! # Cycles
//!
//! Within a group, an alias reference at an *unguarded* position (the top of
//! a definition, or directly under `forall`) is a dependency edge. A cycle of
//! such edges can never be expanded to a structural type and is reported as
//! `AliasCycle`. References below `List`/record/dict/function constructors
//! are guarded and become links in the pool, giving finite recursive types.

use rustc_hash::FxHashMap;

use ncl_ir::{AliasDef, Expr, ExprArena, ExprId, Name, ParsedType, ParsedTypeId, StringInterner};
use ncl_stack::ensure_sufficient_stack;

use crate::{TypeData, TypeError, TypeId, TypePool};

/// Stack of alias frames, innermost last.
#[derive(Clone, Default, Debug)]
pub struct AliasScope {
    frames: Vec<FxHashMap<Name, TypeId>>,
}

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: FxHashMap<Name, TypeId>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Innermost alias slot bound to `name`.
    pub fn lookup(&self, name: Name) -> Option<TypeId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&name).copied())
    }
}

/// Resolves parsed annotations into a `TypePool`.
pub struct TypeResolver<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    pool: TypePool,
}

impl<'a> TypeResolver<'a> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        Self {
            arena,
            interner,
            pool: TypePool::new(),
        }
    }

    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    pub fn into_pool(self) -> TypePool {
        self.pool
    }

    /// Resolve one annotation against `scope`.
    pub fn resolve(&mut self, ty: ParsedTypeId, scope: &AliasScope) -> Result<TypeId, TypeError> {
        let mut vars = Vec::new();
        self.resolve_in(ty, scope, &mut vars)
    }

    fn resolve_in(
        &mut self,
        ty: ParsedTypeId,
        scope: &AliasScope,
        vars: &mut Vec<Name>,
    ) -> Result<TypeId, TypeError> {
        let arena = self.arena;
        let data = match arena.parsed_type(ty) {
            ParsedType::Num => TypeData::Num,
            ParsedType::Str => TypeData::Str,
            ParsedType::Bool => TypeData::Bool,
            ParsedType::Dyn => TypeData::Dyn,
            ParsedType::List(elem) => TypeData::List(self.resolve_in(*elem, scope, vars)?),
            ParsedType::Dict(elem) => TypeData::Dict(self.resolve_in(*elem, scope, vars)?),
            ParsedType::Record(fields) => {
                let mut resolved = Vec::with_capacity(fields.len());
                for &(name, field_ty) in fields {
                    resolved.push((name, self.resolve_in(field_ty, scope, vars)?));
                }
                TypeData::Record(resolved)
            }
            ParsedType::Function { param, ret } => {
                let param = self.resolve_in(*param, scope, vars)?;
                let ret = self.resolve_in(*ret, scope, vars)?;
                TypeData::Function { param, ret }
            }
            ParsedType::ForAll { var, body } => {
                vars.push(*var);
                let body = self.resolve_in(*body, scope, vars);
                vars.pop();
                TypeData::ForAll {
                    var: *var,
                    body: body?,
                }
            }
            ParsedType::Var(name) => {
                if !vars.contains(name) {
                    return Err(TypeError::UnboundTypeVariable {
                        name: self.interner.lookup(*name).to_owned(),
                    });
                }
                TypeData::Var(*name)
            }
            ParsedType::Named(name) => {
                // Alias slots are shared: every reference links to the definition.
                return scope.lookup(*name).ok_or_else(|| TypeError::UnboundAlias {
                    name: self.interner.lookup(*name).to_owned(),
                });
            }
        };
        Ok(self.pool.push(data))
    }

    /// Define an alias group and push its frame onto `scope`.
    ///
    /// On error the frame is not left behind. On success the caller pops it
    /// when leaving the `typealias` body.
    pub fn define_aliases(
        &mut self,
        defs: &[AliasDef],
        scope: &mut AliasScope,
    ) -> Result<(), TypeError> {
        let mut frame = FxHashMap::default();
        let slots: Vec<TypeId> = defs
            .iter()
            .map(|def| {
                let slot = self.pool.push(TypeData::Alias {
                    name: def.name,
                    target: None,
                });
                frame.insert(def.name, slot);
                slot
            })
            .collect();

        self.check_unguarded_cycles(defs)?;

        scope.push(frame);
        for (def, &slot) in defs.iter().zip(&slots) {
            match self.resolve(def.ty, scope) {
                Ok(target) => self.pool.set_alias_target(slot, target),
                Err(err) => {
                    scope.pop();
                    return Err(err);
                }
            }
        }
        tracing::trace!(count = defs.len(), depth = scope.depth(), "alias group defined");
        Ok(())
    }

    /// Reject groups whose unguarded references form a cycle.
    fn check_unguarded_cycles(&self, defs: &[AliasDef]) -> Result<(), TypeError> {
        let index: FxHashMap<Name, usize> = defs
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name, i))
            .collect();
        let edges: Vec<Vec<usize>> = defs
            .iter()
            .map(|def| {
                let mut refs = Vec::new();
                self.unguarded_refs(def.ty, &mut refs);
                refs.iter().filter_map(|name| index.get(name).copied()).collect()
            })
            .collect();

        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; defs.len()];
        for start in 0..defs.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // Iterative DFS: (node, next edge to explore)
            let mut path: Vec<(usize, usize)> = vec![(start, 0)];
            marks[start] = Mark::OnPath;
            while let Some((node, next)) = path.last().copied() {
                if let Some(&succ) = edges[node].get(next) {
                    if let Some(top) = path.last_mut() {
                        top.1 += 1;
                    }
                    match marks[succ] {
                        Mark::Unvisited => {
                            marks[succ] = Mark::OnPath;
                            path.push((succ, 0));
                        }
                        Mark::OnPath => {
                            let from = path.iter().position(|&(n, _)| n == succ).unwrap_or(0);
                            let mut cycle: Vec<String> = path[from..]
                                .iter()
                                .map(|&(n, _)| self.interner.lookup(defs[n].name).to_owned())
                                .collect();
                            cycle.push(self.interner.lookup(defs[succ].name).to_owned());
                            return Err(TypeError::AliasCycle { cycle });
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    path.pop();
                }
            }
        }
        Ok(())
    }

    /// Alias names referenced outside any structural constructor.
    fn unguarded_refs(&self, ty: ParsedTypeId, out: &mut Vec<Name>) {
        let node = self.arena.parsed_type(ty);
        if node.is_constructor() {
            return;
        }
        match node {
            ParsedType::Named(name) => out.push(*name),
            ParsedType::ForAll { body, .. } => self.unguarded_refs(*body, out),
            _ => {}
        }
    }
}

/// Result of the annotation pass over a whole program.
#[derive(Clone, Default, Debug)]
pub struct ResolvedAnnotations {
    pool: TypePool,
    annotations: FxHashMap<ParsedTypeId, TypeId>,
}

impl ResolvedAnnotations {
    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    /// Resolved type of an annotation that appears in the program.
    pub fn get(&self, ty: ParsedTypeId) -> Option<TypeId> {
        self.annotations.get(&ty).copied()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// Resolve every annotation reachable from `root`.
///
/// Runs before evaluation, so an alias used outside its scope is reported
/// even if the annotated expression would never be forced.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve_annotations(
    arena: &ExprArena,
    root: ExprId,
    interner: &StringInterner,
) -> Result<ResolvedAnnotations, TypeError> {
    let mut walker = AnnotationWalker {
        resolver: TypeResolver::new(arena, interner),
        scope: AliasScope::new(),
        annotations: FxHashMap::default(),
    };
    walker.visit(root)?;
    tracing::debug!(
        annotations = walker.annotations.len(),
        types = walker.resolver.pool().len(),
        "annotations resolved"
    );
    Ok(ResolvedAnnotations {
        pool: walker.resolver.into_pool(),
        annotations: walker.annotations,
    })
}

struct AnnotationWalker<'a> {
    resolver: TypeResolver<'a>,
    scope: AliasScope,
    annotations: FxHashMap<ParsedTypeId, TypeId>,
}

impl AnnotationWalker<'_> {
    fn annotate(&mut self, ty: ParsedTypeId) -> Result<(), TypeError> {
        let resolved = self.resolver.resolve(ty, &self.scope)?;
        self.annotations.insert(ty, resolved);
        Ok(())
    }

    fn visit(&mut self, id: ExprId) -> Result<(), TypeError> {
        ensure_sufficient_stack(|| self.visit_inner(id))
    }

    fn visit_inner(&mut self, id: ExprId) -> Result<(), TypeError> {
        let arena = self.resolver.arena;
        match arena.expr(id) {
            Expr::Int(_)
            | Expr::Float(_)
            | Expr::Str(_)
            | Expr::Bool(_)
            | Expr::Ident(_) => Ok(()),
            Expr::Lambda { body, .. } => self.visit(*body),
            Expr::Apply { func, arg } => {
                self.visit(*func)?;
                self.visit(*arg)
            }
            Expr::Let { value, body, .. } => {
                self.visit(*value)?;
                self.visit(*body)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.visit(*cond)?;
                self.visit(*then_branch)?;
                self.visit(*else_branch)
            }
            Expr::Binary { left, right, .. } => {
                self.visit(*left)?;
                self.visit(*right)
            }
            Expr::Unary { operand, .. } => self.visit(*operand),
            Expr::List(items) => items.iter().try_for_each(|&item| self.visit(item)),
            Expr::Record(fields) => fields.iter().try_for_each(|field| {
                if let Some(ty) = field.ty {
                    self.annotate(ty)?;
                }
                self.visit(field.value)
            }),
            Expr::Field { receiver, .. } => self.visit(*receiver),
            Expr::Builtin { args, .. } => args.iter().try_for_each(|&arg| self.visit(arg)),
            Expr::Ascribe { expr, ty } => {
                self.annotate(*ty)?;
                self.visit(*expr)
            }
            Expr::TypeAlias { defs, body } => {
                self.resolver.define_aliases(defs, &mut self.scope)?;
                let result = self.visit(*body);
                self.scope.pop();
                result
            }
        }
    }
}
