use std::fmt::Debug;
use std::fmt::Formatter;

use fnv::FnvHashMap;
use itertools::Itertools;
use log::debug;

use super::ModelError;
use super::ReconfigurationProblem;

/// A set of constraints added to a [`ReconfigurationProblem`] before it is solved.
///
/// Views are injected in dependency order: a view is injected only after every view named by
/// [`ModelView::dependencies`].
pub trait ModelView {
    /// The unique name of the view.
    fn identifier(&self) -> &str;

    /// The identifiers of the views which must be injected before this one.
    fn dependencies(&self) -> Vec<String> {
        vec![]
    }

    /// Add the variables and constraints of the view to the problem.
    fn inject(&self, problem: &mut ReconfigurationProblem) -> Result<(), ModelError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// The views registered with a problem.
#[derive(Default)]
pub struct ViewRegistry {
    views: Vec<Box<dyn ModelView>>,
}

impl Debug for ViewRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.views.iter().map(|view| view.identifier()))
            .finish()
    }
}

impl ViewRegistry {
    pub fn add(&mut self, view: Box<dyn ModelView>) {
        self.views.push(view);
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Order the views such that every view comes after its dependencies. Views without an order
    /// between them keep their registration order.
    pub fn resolve(self) -> Result<Vec<Box<dyn ModelView>>, ModelError> {
        let mut index_of = FnvHashMap::default();
        for (index, view) in self.views.iter().enumerate() {
            if index_of.insert(view.identifier(), index).is_some() {
                return Err(ModelError::DuplicateView(view.identifier().to_owned()));
            }
        }

        let dependencies = self
            .views
            .iter()
            .map(|view| {
                view.dependencies()
                    .into_iter()
                    .map(|dependency| {
                        index_of.get(dependency.as_str()).copied().ok_or_else(|| {
                            ModelError::MissingDependency {
                                view: view.identifier().to_owned(),
                                dependency,
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut marks = vec![Mark::Unvisited; self.views.len()];
        let mut order = Vec::with_capacity(self.views.len());

        for root in 0..self.views.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            marks[root] = Mark::OnPath;
            // (view, index of the next dependency to visit)
            let mut path = vec![(root, 0)];
            while let Some((view, next)) = path.last_mut() {
                let view = *view;
                let Some(&dependency) = dependencies[view].get(*next) else {
                    marks[view] = Mark::Done;
                    order.push(view);
                    let _ = path.pop();
                    continue;
                };
                *next += 1;

                match marks[dependency] {
                    Mark::Unvisited => {
                        marks[dependency] = Mark::OnPath;
                        path.push((dependency, 0));
                    }
                    Mark::OnPath => {
                        let cycle = path
                            .iter()
                            .skip_while(|&&(member, _)| member != dependency)
                            .map(|&(member, _)| member)
                            .chain(std::iter::once(dependency))
                            .map(|member| self.views[member].identifier().to_owned())
                            .collect();
                        return Err(ModelError::DependencyCycle { cycle });
                    }
                    Mark::Done => {}
                }
            }
        }

        debug!(
            "view order: {}",
            order
                .iter()
                .map(|&index| self.views[index].identifier())
                .join(", ")
        );

        let mut views = self.views.into_iter().map(Some).collect::<Vec<_>>();
        Ok(order
            .into_iter()
            .filter_map(|index| views[index].take())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        identifier: &'static str,
        dependencies: Vec<&'static str>,
    }

    impl ModelView for Named {
        fn identifier(&self) -> &str {
            self.identifier
        }

        fn dependencies(&self) -> Vec<String> {
            self.dependencies.iter().map(|&d| d.to_owned()).collect()
        }

        fn inject(&self, _: &mut ReconfigurationProblem) -> Result<(), ModelError> {
            Ok(())
        }
    }

    fn registry(views: Vec<(&'static str, Vec<&'static str>)>) -> ViewRegistry {
        let mut registry = ViewRegistry::default();
        for (identifier, dependencies) in views {
            registry.add(Box::new(Named {
                identifier,
                dependencies,
            }));
        }
        registry
    }

    fn order(registry: ViewRegistry) -> Result<Vec<String>, ModelError> {
        registry.resolve().map(|views| {
            views
                .iter()
                .map(|view| view.identifier().to_owned())
                .collect()
        })
    }

    #[test]
    fn dependencies_come_first() {
        let registry = registry(vec![
            ("spread", vec!["scheduler"]),
            ("ban", vec![]),
            ("scheduler", vec!["ban"]),
        ]);

        assert_eq!(
            order(registry),
            Ok(vec!["ban".into(), "scheduler".into(), "spread".into()])
        );
    }

    #[test]
    fn independent_views_keep_their_order() {
        let registry = registry(vec![("b", vec![]), ("a", vec![]), ("c", vec![])]);

        assert_eq!(
            order(registry),
            Ok(vec!["b".into(), "a".into(), "c".into()])
        );
    }

    #[test]
    fn cycles_are_reported() {
        let registry = registry(vec![
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
            ("d", vec![]),
        ]);

        assert_eq!(
            order(registry),
            Err(ModelError::DependencyCycle {
                cycle: vec!["a".into(), "b".into(), "c".into(), "a".into()]
            })
        );
    }

    #[test]
    fn a_view_depending_on_itself_is_a_cycle() {
        let registry = registry(vec![("a", vec!["a"])]);

        assert_eq!(
            order(registry),
            Err(ModelError::DependencyCycle {
                cycle: vec!["a".into(), "a".into()]
            })
        );
    }

    #[test]
    fn unknown_dependencies_are_reported() {
        let registry = registry(vec![("a", vec!["missing"])]);

        assert_eq!(
            order(registry),
            Err(ModelError::MissingDependency {
                view: "a".into(),
                dependency: "missing".into()
            })
        );
    }

    #[test]
    fn identifiers_are_unique() {
        let registry = registry(vec![("a", vec![]), ("a", vec![])]);

        assert_eq!(order(registry), Err(ModelError::DuplicateView("a".into())));
    }
}
