//! Test fixtures for predef resolver testing
//!
//! Each fixture is a small host model built the way a type checker would
//! report the corresponding declarations. The declarations are given in the
//! doc comment of every builder function.

use predef_core::{ObjectFlags, TypeFlags};
use predef_snapshot::{
    HostSnapshot, ParamSpec, PropertySpec, SnapshotBuilder, SnapshotHost,
};
use std::path::PathBuf;

/// Test fixture categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureType {
    Primitives,
    SelfReferential,
    SharedInterface,
    GenericContainer,
    Tuple,
    Aliases,
    AliasOfAlias,
    SelfReferentialLiteral,
    NodeLike,
    ConditionalType,
    EnumType,
    MappedType,
    MissingDeclaration,
}

impl FixtureType {
    pub const ALL: [FixtureType; 13] = [
        FixtureType::Primitives,
        FixtureType::SelfReferential,
        FixtureType::SharedInterface,
        FixtureType::GenericContainer,
        FixtureType::Tuple,
        FixtureType::Aliases,
        FixtureType::AliasOfAlias,
        FixtureType::SelfReferentialLiteral,
        FixtureType::NodeLike,
        FixtureType::ConditionalType,
        FixtureType::EnumType,
        FixtureType::MappedType,
        FixtureType::MissingDeclaration,
    ];

    /// Fixtures the resolver is expected to turn into a bundle
    pub fn resolves(self) -> bool {
        !matches!(
            self,
            FixtureType::ConditionalType
                | FixtureType::EnumType
                | FixtureType::MappedType
                | FixtureType::MissingDeclaration
        )
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            FixtureType::Primitives => "primitives",
            FixtureType::SelfReferential => "self_referential",
            FixtureType::SharedInterface => "shared_interface",
            FixtureType::GenericContainer => "generic_container",
            FixtureType::Tuple => "tuple",
            FixtureType::Aliases => "aliases",
            FixtureType::AliasOfAlias => "alias_of_alias",
            FixtureType::SelfReferentialLiteral => "self_referential_literal",
            FixtureType::NodeLike => "node_like",
            FixtureType::ConditionalType => "conditional_type",
            FixtureType::EnumType => "enum_type",
            FixtureType::MappedType => "mapped_type",
            FixtureType::MissingDeclaration => "missing_declaration",
        }
    }
}

/// Main test fixtures provider
pub struct TestFixtures {
    temp_dir: Option<tempfile::TempDir>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { temp_dir: None }
    }

    pub fn snapshot(fixture_type: FixtureType) -> HostSnapshot {
        let mut b = SnapshotBuilder::new();
        match fixture_type {
            FixtureType::Primitives => primitives(&mut b),
            FixtureType::SelfReferential => self_referential(&mut b),
            FixtureType::SharedInterface => shared_interface(&mut b),
            FixtureType::GenericContainer => generic_container(&mut b),
            FixtureType::Tuple => tuple(&mut b),
            FixtureType::Aliases => aliases(&mut b),
            FixtureType::AliasOfAlias => alias_of_alias(&mut b),
            FixtureType::SelfReferentialLiteral => self_referential_literal(&mut b),
            FixtureType::NodeLike => node_like(&mut b),
            FixtureType::ConditionalType => conditional_type(&mut b),
            FixtureType::EnumType => enum_type(&mut b),
            FixtureType::MappedType => mapped_type(&mut b),
            FixtureType::MissingDeclaration => missing_declaration(&mut b),
        }
        b.build()
    }

    pub fn host(fixture_type: FixtureType) -> SnapshotHost {
        SnapshotHost::new(Self::snapshot(fixture_type)).unwrap()
    }

    /// Write the fixture snapshot into a temporary directory and return its path.
    /// `extension` selects the format, `json` or `yaml`.
    pub fn setup(&mut self, fixture_type: FixtureType, extension: &str) -> PathBuf {
        if self.temp_dir.is_none() {
            self.temp_dir = Some(tempfile::tempdir().unwrap());
        }
        let dir = self.temp_dir.as_ref().unwrap().path();
        let path = dir.join(format!("{}.{}", fixture_type.file_stem(), extension));
        Self::snapshot(fixture_type).save(&path).unwrap();
        path
    }

    /// Path inside the fixture directory for outputs written by a test
    pub fn output_path(&mut self, name: &str) -> PathBuf {
        if self.temp_dir.is_none() {
            self.temp_dir = Some(tempfile::tempdir().unwrap());
        }
        self.temp_dir.as_ref().unwrap().path().join(name)
    }
}

/// ```ts
/// declare var s: string;
/// declare var n: number;
/// declare var flag: boolean;
/// declare var u: undefined;
/// declare var nothing: null;
/// declare var never: never;
/// declare var sym: unique symbol;
/// declare var obj: object;
/// declare var anything: any;
/// declare var mixed: string | number | boolean;
/// declare var foo: "foo";
/// declare var answer: 42;
/// declare var half: 0.5;
/// declare var yes: true;
/// ```
fn primitives(b: &mut SnapshotBuilder) {
    let global = b.global();
    let string = b.string();
    let number = b.number();
    let boolean = b.boolean();
    let undefined = b.intrinsic(TypeFlags::UNDEFINED);
    let null = b.intrinsic(TypeFlags::NULL);
    let never = b.intrinsic(TypeFlags::NEVER);
    let symbol = b.intrinsic(TypeFlags::UNIQUE_ES_SYMBOL);
    let object = b.intrinsic(TypeFlags::NON_PRIMITIVE);
    let any = b.any();
    let mixed = b.union(&[string, number, boolean]);
    let foo = b.string_literal("foo");
    let answer = b.number_literal(42.0);
    let half = b.number_literal(0.5);
    let yes = b.boolean_literal(true);

    for (name, ty) in [
        ("s", string),
        ("n", number),
        ("flag", boolean),
        ("u", undefined),
        ("nothing", null),
        ("never", never),
        ("sym", symbol),
        ("obj", object),
        ("anything", any),
        ("mixed", mixed),
        ("foo", foo),
        ("answer", answer),
        ("half", half),
        ("yes", yes),
    ] {
        b.property(global, PropertySpec::variable(name, ty));
    }
}

/// ```ts
/// interface A { self: A; }
/// declare var a: A;
/// ```
fn self_referential(b: &mut SnapshotBuilder) {
    let global = b.global();
    let a = b.interface("A");
    b.property(a, PropertySpec::data("self", a));
    b.property(global, PropertySpec::variable("a", a));
}

/// ```ts
/// interface Point { readonly x: number; y: number; }
/// interface Named { label: string; }
/// declare var start: Point;
/// declare var end: Point;
/// declare var marker: Named & Point;
/// ```
fn shared_interface(b: &mut SnapshotBuilder) {
    let global = b.global();
    let number = b.number();
    let string = b.string();
    let point = b.interface("Point");
    b.property(point, PropertySpec::data("x", number).readonly());
    b.property(point, PropertySpec::data("y", number));
    let named = b.interface("Named");
    b.property(named, PropertySpec::data("label", string));
    let marker = b.intersection(&[named, point]);
    b.property(global, PropertySpec::variable("start", point));
    b.property(global, PropertySpec::variable("end", point));
    b.property(global, PropertySpec::variable("marker", marker));
}

/// ```ts
/// interface Container<T> {
///     value: T;
///     map<U>(f: (value: T) => U): Container<U>;
/// }
/// declare var strings: Container<string>;
/// declare var numbers: Container<number>;
/// declare var nested: Container<Container<string>>;
/// ```
fn generic_container(b: &mut SnapshotBuilder) {
    let global = b.global();
    let string = b.string();
    let number = b.number();
    let (container, params) = b.generic_interface("Container", &["T"]);
    let t = params[0];
    b.property(container, PropertySpec::data("value", t));

    let u = b.type_parameter("U");
    let mapper = b.function(&[ParamSpec::new("value", t)], u);
    let mapped = b.instantiate(container, &[u]);
    let signature = b.signature(&[u], &[ParamSpec::new("f", mapper)], mapped);
    let map = b.object_literal();
    b.call_signature(map, signature);
    b.property(container, PropertySpec::method("map", map));

    let strings = b.instantiate(container, &[string]);
    let numbers = b.instantiate(container, &[number]);
    let nested = b.instantiate(container, &[strings]);
    b.property(global, PropertySpec::variable("strings", strings));
    b.property(global, PropertySpec::variable("numbers", numbers));
    b.property(global, PropertySpec::variable("nested", nested));
}

/// ```ts
/// declare var pair: [string, number];
/// ```
fn tuple(b: &mut SnapshotBuilder) {
    let global = b.global();
    let string = b.string();
    let number = b.number();
    let pair = b.tuple(&[string, number]);
    b.property(global, PropertySpec::variable("pair", pair));
}

/// ```ts
/// type Pair<T> = [T, T];
/// type Callback = (error: string | undefined) => void;
/// type Tree = { value: number; left?: Tree; right?: Tree };
/// type Id = string;
/// declare var names: Pair<string>;
/// declare var points: Pair<number>;
/// declare var done: Callback;
/// declare var onError: Callback;
/// declare var tree: Tree;
/// declare var key: Id;
/// ```
fn aliases(b: &mut SnapshotBuilder) {
    let global = b.global();
    let string = b.string();
    let number = b.number();
    let void = b.void();
    let undefined = b.intrinsic(TypeFlags::UNDEFINED);

    let (pair, params) = b.type_alias("Pair", &["T"]);
    let body = b.tuple(&[params[0], params[0]]);
    b.alias_body(pair, body);

    let (callback, _) = b.type_alias("Callback", &[]);
    let error = b.union(&[string, undefined]);
    let body = b.function(&[ParamSpec::new("error", error)], void);
    b.alias_body(callback, body);

    let (tree, _) = b.type_alias("Tree", &[]);
    let body = b.object_literal();
    b.alias_body(tree, body);
    b.property(body, PropertySpec::data("value", number));
    b.property(body, PropertySpec::data("left", body).optional());
    b.property(body, PropertySpec::data("right", body).optional());

    let (id, _) = b.type_alias("Id", &[]);
    let body = b.string();
    b.alias_body(id, body);

    let names = b.alias_instance(pair, &[string]);
    let points = b.alias_instance(pair, &[number]);
    let done = b.alias_instance(callback, &[]);
    let on_error = b.alias_instance(callback, &[]);
    let tree_value = b.alias_instance(tree, &[]);
    let key = b.alias_instance(id, &[]);
    for (name, ty) in [
        ("names", names),
        ("points", points),
        ("done", done),
        ("onError", on_error),
        ("tree", tree_value),
        ("key", key),
    ] {
        b.property(global, PropertySpec::variable(name, ty));
    }
}

/// ```ts
/// type Shape = { x: string };
/// type Figure = Shape;
/// type Boxed<T> = { value: T };
/// type Crate<T> = Boxed<T>;
/// declare var figure: Figure;
/// declare var shape: Shape;
/// declare var crate: Crate<number>;
/// ```
fn alias_of_alias(b: &mut SnapshotBuilder) {
    let global = b.global();
    let string = b.string();
    let number = b.number();

    let (shape, _) = b.type_alias("Shape", &[]);
    let shape_body = b.object_literal();
    b.alias_body(shape, shape_body);
    b.property(shape_body, PropertySpec::data("x", string));

    // the checker hands back the body of Shape, alias symbol included
    let (figure, _) = b.type_alias("Figure", &[]);
    b.alias_target(figure, shape_body);

    let (boxed, boxed_params) = b.type_alias("Boxed", &["T"]);
    let boxed_body = b.object_literal();
    b.alias_body(boxed, boxed_body);
    b.property(boxed_body, PropertySpec::data("value", boxed_params[0]));

    let (crate_alias, crate_params) = b.type_alias("Crate", &["T"]);
    let boxed_of_t = b.alias_instance(boxed, &[crate_params[0]]);
    b.alias_target(crate_alias, boxed_of_t);

    let figure_value = b.alias_instance(figure, &[]);
    let shape_value = b.alias_instance(shape, &[]);
    let crate_value = b.alias_instance(crate_alias, &[number]);
    for (name, ty) in [
        ("figure", figure_value),
        ("shape", shape_value),
        ("crate", crate_value),
    ] {
        b.property(global, PropertySpec::variable(name, ty));
    }
}

/// An object literal type that refers to itself, reachable from two variables:
///
/// ```ts
/// declare var first: { label: string; self: typeof first };
/// declare var second: typeof first;
/// ```
fn self_referential_literal(b: &mut SnapshotBuilder) {
    let global = b.global();
    let string = b.string();
    let literal = b.object_literal();
    b.property(literal, PropertySpec::data("label", string));
    b.property(literal, PropertySpec::data("self", literal));
    b.property(global, PropertySpec::variable("first", literal));
    b.property(global, PropertySpec::variable("second", literal));
}

/// A small slice of a Node-style environment:
///
/// ```ts
/// // globals.d.ts
/// declare namespace NodeJS {
///     interface Process { readonly pid: number; env: Env; cwd(): string; }
///     interface Env { [key: string]: string | undefined; }
/// }
/// declare var process: NodeJS.Process;
/// declare var globalThis: typeof globalThis;
/// // events.d.ts
/// declare class EventEmitter { constructor(); on(event: string, listener: Function): this; }
/// // stream.d.ts
/// declare class Readable extends EventEmitter { readonly readable: boolean; read(size?: number): any; }
/// declare module "fs" {
///     interface Stats { size: number; isFile(): boolean; }
///     function statSync(path: string): Stats;
///     function createReadStream(path: string): Readable;
/// }
/// declare module "path" {
///     function join(...paths: string[]): string;
///     const sep: "/" | "\\";
/// }
/// declare var statsKeys: keyof Stats;
/// declare var statsSize: Stats["size"];
/// ```
fn node_like(b: &mut SnapshotBuilder) {
    b.in_file("globals.d.ts");
    let global = b.global();
    let string = b.string();
    let number = b.number();
    let boolean = b.boolean();
    let any = b.any();
    let undefined = b.intrinsic(TypeFlags::UNDEFINED);

    let process = b.interface("NodeJS.Process");
    let env = b.interface("NodeJS.Env");
    b.property(process, PropertySpec::data("pid", number).readonly());
    b.property(process, PropertySpec::data("env", env));
    let cwd = b.function(&[], string);
    b.property(process, PropertySpec::method("cwd", cwd));
    let maybe_string = b.union(&[string, undefined]);
    b.property(env, PropertySpec::data("PATH", maybe_string).optional());
    b.property(global, PropertySpec::variable("process", process));
    b.property(global, PropertySpec::variable("globalThis", global));

    b.in_file("events.d.ts");
    let emitter = b.class("EventEmitter");
    let new_emitter = b.signature(&[], &[], emitter);
    b.construct_signature(emitter, new_emitter);
    let listener = b.function(&[], any);
    let on = b.function(
        &[
            ParamSpec::new("event", string),
            ParamSpec::new("listener", listener),
        ],
        emitter,
    );
    b.property(emitter, PropertySpec::method("on", on));

    b.in_file("stream.d.ts");
    let readable = b.class("Readable");
    b.extend(readable, emitter);
    b.property(readable, PropertySpec::data("readable", boolean).readonly());
    let read = b.function(&[ParamSpec::new("size", number).optional()], any);
    b.property(readable, PropertySpec::method("read", read));
    // merged declarations of the same class
    let readable_symbol = b.symbol_of(readable).unwrap();
    b.in_file("stream/web.d.ts");
    b.redeclare(readable_symbol);
    b.in_file("stream.d.ts");
    b.redeclare(readable_symbol);

    b.in_file("fs.d.ts");
    let fs = b.ambient_module("fs");
    let stats = b.interface("\"fs\".Stats");
    b.property(stats, PropertySpec::data("size", number));
    let is_file = b.function(&[], boolean);
    b.property(stats, PropertySpec::method("isFile", is_file));
    let stat_sync = b.function(&[ParamSpec::new("path", string)], stats);
    b.property(fs, PropertySpec::variable("statSync", stat_sync));
    let create_read_stream = b.function(&[ParamSpec::new("path", string)], readable);
    b.property(fs, PropertySpec::variable("createReadStream", create_read_stream));

    b.in_file("path.d.ts");
    let path = b.ambient_module("path");
    let (array, _) = b.generic_interface("Array", &["T"]);
    let string_array = b.instantiate(array, &[string]);
    let join = b.function(&[ParamSpec::new("paths", string_array)], string);
    b.property(path, PropertySpec::variable("join", join));
    let slash = b.string_literal("/");
    let backslash = b.string_literal("\\");
    let sep = b.union(&[slash, backslash]);
    b.property(path, PropertySpec::variable("sep", sep).readonly());

    b.in_file("globals.d.ts");
    let keys = b.keyof(stats);
    let size_key = b.string_literal("size");
    let size = b.indexed_access(stats, size_key);
    b.constrain(size, number);
    b.property(global, PropertySpec::variable("statsKeys", keys));
    b.property(global, PropertySpec::variable("statsSize", size));
}

/// ```ts
/// declare var picked: string extends number ? true : false;
/// ```
fn conditional_type(b: &mut SnapshotBuilder) {
    let global = b.global();
    let conditional = b.conditional();
    b.property(global, PropertySpec::variable("picked", conditional));
}

/// ```ts
/// declare enum Direction { Up, Down }
/// declare var direction: Direction;
/// ```
fn enum_type(b: &mut SnapshotBuilder) {
    let global = b.global();
    let direction = b.enumeration("Direction", &[0.0, 1.0]);
    b.property(global, PropertySpec::variable("direction", direction));
}

/// ```ts
/// declare var partial: { [K in "a" | "b"]?: string };
/// ```
fn mapped_type(b: &mut SnapshotBuilder) {
    let global = b.global();
    let mapped = b.raw(TypeFlags::OBJECT, ObjectFlags::MAPPED);
    b.property(global, PropertySpec::variable("partial", mapped));
}

/// A data member the host reports without any declaration site
fn missing_declaration(b: &mut SnapshotBuilder) {
    let global = b.global();
    let string = b.string();
    let ghost = b.interface("Ghost");
    b.property(ghost, PropertySpec::data("name", string).without_declaration());
    b.property(global, PropertySpec::variable("ghost", ghost));
}
