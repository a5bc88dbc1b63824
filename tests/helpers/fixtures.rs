//! Template and values fixtures.

pub const TEMPLATE_URI: &str = "file:///test.yaml";
pub const VALUES_URI: &str = "file:///values.yaml";
pub const OTHER_VALUES_URI: &str = "file:///values.other.yaml";

/// A chart template exercising variables, ranges and values references.
/// Line numbers are 0-based and marked at the end of each line.
pub const TEMPLATE: &str = r#"
{{ $variable := "text" }} # line 1
{{ $variable }}           # line 2

{{ $someOther := "text" }}# line 4
{{ $variable }}           # line 5

{{ range $index, $element := pipeline }}{{ $index }}{{ $element }}{{ end }} # line 7
{{ .Values.foo }} # line 8
{{ .Values.something.nested }} # line 9

{{ range .Values.list }}
{{ . }} # line 12
{{ end }}
"#;

pub const VALUES: &str = "
foo: bar
something:
  nested: false
list:
  - test
";

/// Scoping cases: shadowing inside a range and expiry after its `end`.
pub const SHADOWING_TEMPLATE: &str = r#"{{ $x := "outer" }}
{{ range .Values.list }}
  {{ $x := "inner" }}
  {{ $x }}
{{ end }}
{{ $x }}
"#;

/// Values reached through `with`, variables and `$`.
pub const CONTEXT_TEMPLATE: &str = r#"{{ with .Values.something }}
  {{ .nested }}
  {{ $.Values.foo }}
{{ end }}
{{ $s := .Values.something }}
{{ $s.nested }}
{{ range $i, $item := .Values.list }}{{ $item }}{{ end }}
{{ .Chart.Name }}
{{ .Values.missing }}
"#;
