//! Command tree and argv dispatch
//!
//! A [`CommandGroup`] owns named children, each either a [`CommandLeaf`]
//! that consumes the remaining argv or another group. Dispatch walks the
//! tree by consuming leading tokens that name children.

use std::collections::BTreeMap;
use std::fmt;

use clap::Parser;

use crate::DispatchError;

/// Handler invoked for a leaf or a group fallback.
pub type Handler<C, E> = Box<dyn Fn(&mut C, &Invocation) -> Result<(), E>>;

/// What a handler receives: the command path that led to it and the
/// unconsumed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Names from the root down to the invoked node, e.g. `["efr", "gh", "list"]`
    pub path: Vec<String>,
    pub args: Vec<String>,
}

impl Invocation {
    /// Command path joined with spaces, as shown in usage lines.
    pub fn display_path(&self) -> String {
        self.path.join(" ")
    }

    /// Parse the arguments with a clap parser named after the command path.
    ///
    /// Help and version requests come back as `clap::Error` with the
    /// matching kind, as with `try_parse_from`.
    pub fn parse<T: Parser>(&self) -> Result<T, clap::Error> {
        T::try_parse_from(std::iter::once(self.display_path()).chain(self.args.iter().cloned()))
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A leaf or fallback handler ran.
    Ran,
    /// A group listing was requested or no fallback was set.
    Help(String),
}

/// A command that receives all remaining arguments.
pub struct CommandLeaf<C, E> {
    name: String,
    about: String,
    handler: Handler<C, E>,
}

/// A named set of subcommands with an optional no-subcommand fallback.
pub struct CommandGroup<C, E> {
    name: String,
    about: String,
    children: BTreeMap<String, CommandNode<C, E>>,
    fallback: Option<Handler<C, E>>,
}

/// Node of a command tree.
pub enum CommandNode<C, E> {
    Leaf(CommandLeaf<C, E>),
    Group(CommandGroup<C, E>),
}

impl<C, E> CommandLeaf<C, E> {
    pub fn new<F>(name: impl Into<String>, about: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut C, &Invocation) -> Result<(), E> + 'static,
    {
        Self {
            name: name.into(),
            about: about.into(),
            handler: Box::new(handler),
        }
    }
}

impl<C, E> CommandGroup<C, E> {
    pub fn new(name: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
            children: BTreeMap::new(),
            fallback: None,
        }
    }

    /// Builder form of [`insert`](Self::insert) that discards any replaced child.
    pub fn with_child(mut self, child: impl Into<CommandNode<C, E>>) -> Self {
        self.insert(child.into());
        self
    }

    /// Run `handler` when the group is invoked without a subcommand.
    pub fn with_fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut C, &Invocation) -> Result<(), E> + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Attach `child` under its own name, returning the child it replaced.
    pub fn insert(&mut self, child: CommandNode<C, E>) -> Option<CommandNode<C, E>> {
        self.children.insert(child.name().to_string(), child)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn get(&self, name: &str) -> Option<&CommandNode<C, E>> {
        self.children.get(name)
    }

    /// Child names in sorted order.
    pub fn child_names(&self) -> Vec<String> {
        self.children.keys().cloned().collect()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Route `args` through the tree and run the selected handler.
    ///
    /// Leading tokens naming children are consumed; the first leaf receives
    /// everything after its name. A group reached with no tokens left runs
    /// its fallback, or yields its help listing when it has none. `-h` or
    /// `--help` in group position yields that group's listing.
    pub fn dispatch(&self, ctx: &mut C, args: &[String]) -> Result<Dispatch, DispatchError<E>> {
        let mut group = self;
        let mut path = vec![self.name.clone()];
        let mut rest = args;

        loop {
            let Some((token, tail)) = rest.split_first() else {
                return match &group.fallback {
                    Some(fallback) => {
                        let invocation = Invocation {
                            path,
                            args: Vec::new(),
                        };
                        fallback(ctx, &invocation).map_err(DispatchError::Command)?;
                        Ok(Dispatch::Ran)
                    }
                    None => Ok(Dispatch::Help(group.help(&path.join(" ")))),
                };
            };

            if token == "-h" || token == "--help" {
                return Ok(Dispatch::Help(group.help(&path.join(" "))));
            }

            match group.children.get(token.as_str()) {
                Some(CommandNode::Leaf(leaf)) => {
                    path.push(leaf.name.clone());
                    let invocation = Invocation {
                        path,
                        args: tail.to_vec(),
                    };
                    (leaf.handler)(ctx, &invocation).map_err(DispatchError::Command)?;
                    return Ok(Dispatch::Ran);
                }
                Some(CommandNode::Group(child)) => {
                    path.push(child.name.clone());
                    group = child;
                    rest = tail;
                }
                None => {
                    return Err(DispatchError::UnknownCommand {
                        path: path.join(" "),
                        name: token.clone(),
                        available: group.child_names(),
                    });
                }
            }
        }
    }

    /// Help listing for this group, invoked as `display_path`.
    pub fn help(&self, display_path: &str) -> String {
        let mut out = String::new();
        if !self.about.is_empty() {
            out.push_str(&self.about);
            out.push_str("\n\n");
        }
        out.push_str(&format!("Usage: {display_path} <COMMAND> [ARGS]...\n"));

        if self.children.is_empty() {
            out.push_str("\nNo commands available.\n");
            return out;
        }

        out.push_str("\nCommands:\n");
        let width = self.children.keys().map(String::len).max().unwrap_or(0);
        for (name, child) in &self.children {
            out.push_str(&format!("  {name:<width$}  {}\n", child.about()));
        }
        out
    }
}

impl<C, E> CommandNode<C, E> {
    pub fn name(&self) -> &str {
        match self {
            CommandNode::Leaf(leaf) => &leaf.name,
            CommandNode::Group(group) => &group.name,
        }
    }

    pub fn about(&self) -> &str {
        match self {
            CommandNode::Leaf(leaf) => &leaf.about,
            CommandNode::Group(group) => &group.about,
        }
    }

    /// Whether dispatching to this node can run anything.
    pub fn is_invocable(&self) -> bool {
        match self {
            CommandNode::Leaf(_) => true,
            CommandNode::Group(group) => group.fallback.is_some() || !group.children.is_empty(),
        }
    }
}

impl<C, E> From<CommandLeaf<C, E>> for CommandNode<C, E> {
    fn from(leaf: CommandLeaf<C, E>) -> Self {
        CommandNode::Leaf(leaf)
    }
}

impl<C, E> From<CommandGroup<C, E>> for CommandNode<C, E> {
    fn from(group: CommandGroup<C, E>) -> Self {
        CommandNode::Group(group)
    }
}

impl<C, E> fmt::Debug for CommandNode<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandNode::Leaf(leaf) => f.debug_struct("Leaf").field("name", &leaf.name).finish(),
            CommandNode::Group(group) => f
                .debug_struct("Group")
                .field("name", &group.name)
                .field("children", &group.child_names())
                .field("fallback", &group.fallback.is_some())
                .finish(),
        }
    }
}
