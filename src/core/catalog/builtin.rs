//! Built-in descriptors.
//!
//! Implementations are kept as source text and spliced into the generated
//! packages verbatim.

use crate::core::catalog::Catalog;
use crate::core::descriptor::{
    EsShimDescriptor, ManualDescriptor, PackageDescriptor, SingleFileDescriptor,
};

const SHARED: &str = "@nolyfill/shared";
const WORKSPACE: &str = "workspace:*";

fn es(name: &str, implementation: &str, is_static: bool) -> EsShimDescriptor {
    EsShimDescriptor::new(name, implementation, is_static)
}

fn single(name: &str, source: &str) -> SingleFileDescriptor {
    SingleFileDescriptor::new(name, source)
}

fn manual(name: &str) -> ManualDescriptor {
    ManualDescriptor {
        name: name.to_string(),
    }
}

pub(super) fn catalog() -> Catalog {
    let mut packages: Vec<PackageDescriptor> = Vec::new();
    packages.extend(es_shims().into_iter().map(PackageDescriptor::from));
    packages.extend(single_files().into_iter().map(PackageDescriptor::from));
    packages.extend(manual_packages().into_iter().map(PackageDescriptor::from));
    Catalog::new(packages)
}

fn es_shims() -> Vec<EsShimDescriptor> {
    vec![
        es("array-includes", "Array.prototype.includes", false),
        es(
            "array.prototype.findlastindex",
            r#"Array.prototype.findLastIndex || function (callback, thisArg) {
  for (let i = this.length - 1; i >= 0; i--) {
    if (callback.call(thisArg, this[i], i, this)) return i;
  }
  return -1;
}"#,
            false,
        ),
        es("array.prototype.flat", "Array.prototype.flat", false),
        es("array.prototype.flatmap", "Array.prototype.flatMap", false),
        es("arraybuffer.prototype.slice", "ArrayBuffer.prototype.slice", false),
        es("function.prototype.name", "Function.prototype.name", false),
        es("has", "Object.prototype.hasOwnProperty", false),
        es("object-keys", "Object.keys", true),
        es("object.assign", "Object.assign", true),
        es("object.entries", "Object.entries", true),
        es("object.fromentries", "Object.fromEntries", true),
        es(
            "object.hasown",
            "Object.hasOwn || require('@nolyfill/shared').uncurryThis(Object.prototype.hasOwnProperty)",
            true,
        )
        .dependency(SHARED, WORKSPACE),
        es("object.values", "Object.values", true),
        es("string.prototype.trim", "String.prototype.trim", false),
        es("string.prototype.trimend", "String.prototype.trimEnd", false),
        es("string.prototype.trimstart", "String.prototype.trimStart", false),
        es("string.prototype.trimleft", "String.prototype.trimLeft", false),
        es("string.prototype.trimright", "String.prototype.trimRight", false),
        es("string.prototype.matchall", "String.prototype.matchAll", false),
        es("regexp.prototype.flags", "RegExp.prototype.flags", false),
        // globalthis is manual: its entrypoint is a function, not the implementation
        es(
            "array.prototype.tosorted",
            r#"Array.prototype.toSorted || function (compareFn) {
  const o = Object(this);
  const l = Number(o.length);
  const a = new Array(l);
  for (let i = 0; i < l; i++) {
    a[i] = o[i];
  }
  Array.prototype.sort.call(a, compareFn);
  return a;
}"#,
            false,
        ),
        es(
            "object.groupby",
            r#"Object.groupBy || function (items, callbackfn) {
  const o = Object.create(null);
  let k = 0;
  for (const value of items) {
    const key = callbackfn(value, k++);
    if (key in o) {
      Array.prototype.push.call(o[key], value);
    } else {
      o[key] = [value];
    }
  }
  return o;
}"#,
            true,
        ),
        es("array.prototype.find", "Array.prototype.find", false),
        es("array.from", "Array.from", true),
        es("string.prototype.padend", "String.prototype.padEnd", false),
        es("string.prototype.padstart", "String.prototype.padStart", false),
        es(
            "object.getownpropertydescriptors",
            "Object.getOwnPropertyDescriptors",
            true,
        ),
        es("array.prototype.reduce", "Array.prototype.reduce", false),
        es("object-is", "Object.is", true),
        es("reflect.ownkeys", "Reflect.ownKeys", true),
        es("string.prototype.replaceall", "String.prototype.replaceAll", false),
        es("reflect.getprototypeof", "Reflect.getPrototypeOf", true),
        es(
            "es-aggregate-error",
            r#"typeof AggregateError === 'function'
  ? AggregateError
  : (() => {
    function AggregateError(errors, message) {
      const error = new Error(message);
      Object.setPrototypeOf(error, AggregateError.prototype);
      delete error.constructor;
      Object.defineProperty(error, 'errors', { value: Array.from(errors) });
      return error;
    }
    Object.defineProperty(AggregateError, 'prototype', { writable: false });
    Object.defineProperties(AggregateError.prototype, {
      constructor: {
        enumerable: false,
        configurable: true,
        writable: true,
        value: AggregateError
      },
      message: {
        enumerable: false,
        configurable: true,
        writable: true,
        value: ''
      },
      name: {
        enumerable: false,
        configurable: true,
        writable: true,
        value: 'AggregateError'
      }
    });
    Object.setPrototypeOf(AggregateError.prototype, Error.prototype);
    return AggregateError;
  })()"#,
            true,
        ),
        es(
            "promise.any",
            r#"Promise.any || function any(iterable) {
  const AggregateError = require('@nolyfill/es-aggregate-error/polyfill')();
  const $reject = Promise.reject.bind(this);
  const $resolve = Promise.resolve.bind(this);
  const $all = Promise.all.bind(this);

  try {
    return $all(
      Array.from(iterable)
        .map((item) => $resolve(item).then(x => $reject(x), x => x))
    ).then(
      (errors) => {
        throw new AggregateError(errors, 'Every promise rejected');
      },
      x => x
    );
  } catch (e) {
    return $reject(e);
  }
}"#,
            true,
        )
        .dependency("@nolyfill/es-aggregate-error", WORKSPACE)
        .node(">=12.4.0")
        .bind_to("Promise"),
        es(
            "promise.allsettled",
            r#"Promise.allSettled || function allSettled(iterable) {
  const $reject = Promise.reject.bind(this);
  const $resolve = Promise.resolve.bind(this);
  const $all = Promise.all.bind(this);
  return $all(Array.from(iterable).map((item) => {
    const p = $resolve(item);
    try {
      return p.then(
        (value) => ({ status: 'fulfilled', value }),
        (reason) => ({ status: 'rejected', reason })
      );
    } catch (e) {
      return $reject(e);
    }
  }));
}"#,
            true,
        )
        .node(">=12.4.0")
        .bind_to("Promise"),
    ]
}

/// Body shared by the `*ArrayBuffer` brand checks.
const ARRAY_BUFFER_BRAND_CHECK: &str = r#"module.exports = (obj) => {
  if (!obj || typeof obj !== 'object') {
    return false;
  }
  try {
    bL(obj);
    return true;
  } catch (_) {
    return false;
  }
};"#;

fn typed_array_getter(name: &str, getter: &str, property: &str) -> SingleFileDescriptor {
    single(
        name,
        &format!(
            r#"const {{ TypedArrayPrototype, uncurryThis }} = require('@nolyfill/shared');
const {getter} = uncurryThis(Object.getOwnPropertyDescriptor(TypedArrayPrototype, '{property}').get);
module.exports = (value) => {{
  try {{
    return {getter}(value);
  }} catch (e) {{
    return false;
  }}
}};"#
        ),
    )
    .dependency(SHARED, WORKSPACE)
}

fn single_files() -> Vec<SingleFileDescriptor> {
    vec![
        single(
            "has-property-descriptors",
            r#"const hasPropertyDescriptors = () => true;
hasPropertyDescriptors.hasArrayLengthDefineBug = () => false;
module.exports = hasPropertyDescriptors;"#,
        ),
        single("gopd", "module.exports = Object.getOwnPropertyDescriptor;"),
        single("has-proto", "module.exports = () => true;"),
        single(
            "get-symbol-description",
            r#"const { uncurryThis } = require('@nolyfill/shared');
module.exports = uncurryThis(Object.getOwnPropertyDescriptor(Symbol.prototype, 'description').get);"#,
        )
        .dependency(SHARED, WORKSPACE),
        single(
            "is-array-buffer",
            &format!(
                "const {{ uncurryThis }} = require('@nolyfill/shared');\n\
                 const bL = uncurryThis(Object.getOwnPropertyDescriptor(ArrayBuffer.prototype, 'byteLength').get);\n\
                 {}",
                ARRAY_BUFFER_BRAND_CHECK
            ),
        )
        .dependency(SHARED, WORKSPACE),
        single(
            "is-shared-array-buffer",
            &format!(
                "const {{ uncurryThis }} = require('@nolyfill/shared');\n\
                 const bL = uncurryThis(Object.getOwnPropertyDescriptor(SharedArrayBuffer.prototype, 'byteLength').get);\n\
                 {}",
                ARRAY_BUFFER_BRAND_CHECK
            ),
        )
        .dependency(SHARED, WORKSPACE),
        single(
            "typed-array-buffer",
            r#"const { uncurryThis } = require('@nolyfill/shared');
module.exports = uncurryThis(Object.getOwnPropertyDescriptor(Object.getPrototypeOf(Int8Array.prototype), 'buffer').get);"#,
        )
        .dependency(SHARED, WORKSPACE),
        typed_array_getter("typed-array-byte-length", "typedArrayByteLength", "byteLength"),
        typed_array_getter("typed-array-byte-offset", "typedArrayByteOffSet", "byteOffset"),
        typed_array_getter("typed-array-length", "typedArrayLength", "length"),
        single("harmony-reflect", "module.exports = Reflect;"),
        single(
            "array-buffer-byte-length",
            r#"const { uncurryThis } = require('@nolyfill/shared');
const isArrayBuffer = require('@nolyfill/is-array-buffer');
const bL = uncurryThis(Object.getOwnPropertyDescriptor(ArrayBuffer.prototype, 'byteLength').get);
module.exports = (ab) => {
  if (!isArrayBuffer(ab)) return NaN;
  return bL(ab);
};"#,
        )
        .dependency("@nolyfill/is-array-buffer", WORKSPACE)
        .dependency(SHARED, WORKSPACE),
        single(
            "iterator.prototype",
            "module.exports = Object.getPrototypeOf(Object.getPrototypeOf([][Symbol.iterator]()));",
        ),
        single(
            "available-typed-arrays",
            r#"module.exports = [
  'BigInt64Array', 'BigUint64Array',
  'Float32Array', 'Float64Array',
  'Int16Array', 'Int32Array', 'Int8Array',
  'Uint16Array', 'Uint32Array', 'Uint8Array', 'Uint8ClampedArray'
];"#,
        ),
        single(
            "which-typed-array",
            r#"const { uncurryThis } = require('@nolyfill/shared');

const cacheEntries = Object.entries([
  'BigInt64Array', 'BigUint64Array',
  'Float32Array', 'Float64Array',
  'Int16Array', 'Int32Array', 'Int8Array',
  'Uint16Array', 'Uint32Array', 'Uint8Array', 'Uint8ClampedArray'
].reduce((acc, typedArray) => {
  const proto = Object.getPrototypeOf(new globalThis[typedArray]());
  acc[`$${typedArray}`] = uncurryThis((
    Object.getOwnPropertyDescriptor(proto, Symbol.toStringTag)
    || Object.getOwnPropertyDescriptor(Object.getPrototypeOf(proto), Symbol.toStringTag)
  ).get);
  return acc;
}, Object.create(null)));

const tryTypedArrays = (value) => {
  let found = false;
  cacheEntries.forEach(([typedArray, getter]) => {
    if (!found) {
      try {
        if (`$${getter(value)}` === typedArray) {
          found = typedArray.slice(1);
        }
      } catch (e) { /**/ }
    }
  });
  return found;
};

module.exports = (value) => {
  if (!value || typeof value !== 'object') { return false; }
  return tryTypedArrays(value);
};"#,
        )
        .dependency(SHARED, WORKSPACE),
        single(
            "which-boxed-primitive",
            r#"module.exports = (value) => {
  if (value == null || (typeof value !== 'object' && typeof value !== 'function')) return null;
  if (typeof value === 'string') return 'String';
  if (typeof value === 'number') return 'Number';
  if (typeof value === 'boolean') return 'Boolean';
  if (typeof value === 'symbol') return 'Symbol';
  if (typeof value === 'bigint') return 'BigInt';
  if (typeof value === 'object') {
    if (Object.prototype.toString.call(value) === '[object String]') return 'String';
    if (Object.prototype.toString.call(value) === '[object Number]') return 'Number';
    if (Object.prototype.toString.call(value) === '[object Boolean]') return 'Number';
    if (
      Object.prototype.toString.call(value) === '[object Symbol]'
      && typeof value.valueOf() === 'symbol'
      && Symbol.prototype.toString.call(value).startsWith('Symbol(')
    ) return 'Symbol';
    try {
      BigInt.prototype.valueOf.call(value);
      return 'BigInt';
    } catch (_) {}
  }
};"#,
        ),
        single(
            "unbox-primitive",
            r#"module.exports = function unboxPrimitive(value) {
  if (value == null || (typeof value !== 'object' && typeof value !== 'function')) {
    throw new TypeError(value === null ? 'value is an unboxed primitive' : 'value is a non-boxed-primitive object');
  }
  if (typeof value === 'string' || Object.prototype.toString.call(value) === '[object String]') {
    return String.prototype.toString.call(value);
  }
  if (typeof value === 'number' || Object.prototype.toString.call(value) === '[object Number]') {
    return Number.prototype.valueOf.call(value);
  }
  if (typeof value === 'boolean' || Object.prototype.toString.call(value) === '[object Boolean]') {
    return Boolean.prototype.valueOf.call(value);
  }
  if (typeof value === 'symbol' || (
    Object.prototype.toString.call(value) === '[object Symbol]'
    && typeof value.valueOf() === 'symbol'
    && Symbol.prototype.toString.call(value).startsWith('Symbol(')
  )) {
    return Symbol.prototype.valueOf.call(value);
  }
  try {
    return BigInt.prototype.valueOf.call(value);
  } catch (_) {}
  throw new RangeError('unknown boxed primitive');
};"#,
        ),
        single(
            "is-regex",
            r#"module.exports = (value) => {
  if (!value || (typeof value !== 'object' && typeof value !== 'function')) return false;
  return Object.prototype.toString.call(value) === '[object RegExp]';
};"#,
        ),
        single(
            "safe-regex-test",
            r#"module.exports = (r) => {
  if (
    !r
    || (typeof r !== 'object' && typeof r !== 'function')
    || Object.prototype.toString.call(r) !== '[object RegExp]'
  ) {
    throw new TypeError('`regex` must be a RegExp');
  }
  return (s) => RegExp.prototype.exec.call(r, s) !== null;
};"#,
        ),
        single(
            "safe-array-concat",
            r#"const empty = [];
empty[Symbol.isConcatSpreadable] = true;
module.exports = (...args) => {
  for (let i = 0, l = args.length; i < l; i += 1) {
    const arg = args[i];
    if (arg && typeof arg === 'object' && typeof arg[Symbol.isConcatSpreadable] === 'boolean') {
      const arr = Array.isArray(arg) ? Array.prototype.slice.call(arg) : [arg];
      arr[Symbol.isConcatSpreadable] = true;
      args[i] = arr;
    }
  }
  return Array.prototype.concat.apply(empty, args);
};"#,
        ),
        single(
            "asynciterator.prototype",
            r#"/* globals AsyncIterator: false */
var asyncIterProto = typeof AsyncIterator === 'function' ? AsyncIterator.prototype : {};
if (!(Symbol.iterator in asyncIterProto)) {
  asyncIterProto[Symbol.iterator] = function () { return this; };
}
module.exports = asyncIterProto;"#,
        ),
        single(
            "is-weakref",
            r#"/* globals WeakRef: false */
module.exports = (value) => {
  if (typeof WeakRef === 'undefined') return false;
  if (!value || typeof value !== 'object') return false;
  try {
    WeakRef.prototype.deref.call(value);
    return true;
  } catch (e) {
    return false;
  }
};"#,
        ),
        single(
            "is-symbol",
            r#"module.exports = (value) => {
  if (typeof value === 'symbol') return true;
  if (Object.prototype.toString.call(value) !== '[object Symbol]') return false;
  try {
    if (typeof value.valueOf() !== 'symbol') return false;
    return Symbol.prototype.toString.call(value).startsWith('Symbol(');
  } catch (e) {
    return false;
  }
};"#,
        ),
        single(
            "is-string",
            r#"module.exports = (value) => {
  if (typeof value === 'string') return true;
  if (typeof value !== 'object') return false;
  try {
    String.prototype.valueOf.call(value);
    return true;
  } catch (e) { return false; }
};"#,
        ),
        single(
            "is-date-object",
            r#"module.exports = (value) => {
  if (typeof value !== 'object' || value === null) return false;
  try {
    Date.prototype.getDay.call(value);
    return true;
  } catch (e) {
    return false;
  }
};"#,
        ),
        single(
            "es-set-tostringtag",
            r#"module.exports = (object, value, options = {}) => {
  if (options.force || !Object.prototype.hasOwnProperty.call(object, Symbol.toStringTag)) {
    Object.defineProperty(object, Symbol.toStringTag, {
      configurable: true,
      enumerable: false,
      value,
      writable: false
    });
  }
};"#,
        ),
        single(
            "define-properties",
            "module.exports = require('@nolyfill/shared').defineProperties",
        )
        .dependency(SHARED, WORKSPACE),
        single("deep-equal", "module.exports = require('dequal').dequal").dependency("dequal", "2.0.3"),
    ]
}

fn manual_packages() -> Vec<ManualDescriptor> {
    vec![
        // main entry point is not uncurried and doesn't follow the es-shim API
        manual("function-bind"),
        // two entries (index.js, shams.js)
        manual("has-tostringtag"),
        manual("has-symbols"),
        // prebundled with rollup
        manual("es-iterator-helpers"),
        // entrypoint is a function, not the implementation
        manual("globalthis"),
    ]
}
