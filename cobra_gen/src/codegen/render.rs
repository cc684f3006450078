/* Go source rendering for an assembled `GoFile` */

use std::fmt::Write;

use super::ir::{
  CommandUnit, DispatchStep, FlagFragment, GoFile, GoImport, InitExpr, ServiceGroup, Subcommand,
};
use crate::error::GenResult;

/* Package-level boilerplate emitted once per service. `$NAME` is the Go
 * service name and `$USE` the group command's `Use`. */
const SERVICE_GROUP_TEMPLATE: &str = r#"var _Default$NAMEClientCommandConfig = _New$NAMEClientCommandConfig()

type _$NAMEClientCommandConfig struct {
	ServerAddr         string
	RequestFile        string
	Stdin              bool
	PrintSampleRequest bool
	ResponseFormat     string
	Timeout            time.Duration
	TLS                bool
	ServerName         string
	InsecureSkipVerify bool
	CACertFile         string
	CertFile           string
	KeyFile            string
	AuthToken          string
	AuthTokenType      string
	JWTKey             string
	JWTKeyFile         string
}

func _New$NAMEClientCommandConfig() *_$NAMEClientCommandConfig {
	c := &_$NAMEClientCommandConfig{
		ServerAddr:     $SERVER_ADDR,
		ResponseFormat: $RESPONSE_FORMAT,
		Timeout:        $TIMEOUT_SECS * time.Second,
		AuthTokenType:  $AUTH_TOKEN_TYPE,
	}
	return c
}

func (o *_$NAMEClientCommandConfig) AddFlags(fs *pflag.FlagSet) {
	fs.StringVarP(&o.ServerAddr, "server-addr", "s", o.ServerAddr, "server address in form of host:port")
	fs.StringVarP(&o.RequestFile, "request-file", "f", o.RequestFile, "client request file (must be json, yaml, or xml); use \"-\" for stdin + json")
	fs.BoolVar(&o.Stdin, "stdin", o.Stdin, "read client request from STDIN; alternative for '-f -'")
	fs.BoolVarP(&o.PrintSampleRequest, "print-sample-request", "p", o.PrintSampleRequest, "print sample request file and exit")
	fs.StringVarP(&o.ResponseFormat, "response-format", "o", o.ResponseFormat, "response format (json, prettyjson, yaml, or xml)")
	fs.DurationVar(&o.Timeout, "timeout", o.Timeout, "client connection timeout")
	fs.BoolVar(&o.TLS, "tls", o.TLS, "enable tls")
	fs.StringVar(&o.ServerName, "tls-server-name", o.ServerName, "tls server name override")
	fs.BoolVar(&o.InsecureSkipVerify, "tls-insecure-skip-verify", o.InsecureSkipVerify, "INSECURE: skip tls checks")
	fs.StringVar(&o.CACertFile, "tls-ca-cert-file", o.CACertFile, "ca certificate file")
	fs.StringVar(&o.CertFile, "tls-cert-file", o.CertFile, "client certificate file")
	fs.StringVar(&o.KeyFile, "tls-key-file", o.KeyFile, "client key file")
	fs.StringVar(&o.AuthToken, "auth-token", o.AuthToken, "authorization token")
	fs.StringVar(&o.AuthTokenType, "auth-token-type", o.AuthTokenType, "authorization token type")
	fs.StringVar(&o.JWTKey, "jwt-key", o.JWTKey, "jwt key")
	fs.StringVar(&o.JWTKeyFile, "jwt-key-file", o.JWTKeyFile, "jwt key file")
}

func $NAMEClientCommand() *cobra.Command {
	cmd := &cobra.Command{
		Use: $USE,
	}
	_Default$NAMEClientCommandConfig.AddFlags(cmd.PersistentFlags())

	for _, s := range _$NAMEClientSubCommands {
		cmd.AddCommand(s())
	}
	return cmd
}

func _Dial$NAME() (*grpc.ClientConn, $NAMEClient, error) {
	cfg := _Default$NAMEClientCommandConfig
	opts := []grpc.DialOption{
		grpc.WithBlock(),
		grpc.WithTimeout(cfg.Timeout),
	}
	if cfg.TLS {
		tlsConfig := &tls.Config{}
		if cfg.InsecureSkipVerify {
			tlsConfig.InsecureSkipVerify = true
		}
		if cfg.CACertFile != "" {
			cacert, err := ioutil.ReadFile(cfg.CACertFile)
			if err != nil {
				return nil, nil, fmt.Errorf("ca cert: %v", err)
			}
			certpool := x509.NewCertPool()
			certpool.AppendCertsFromPEM(cacert)
			tlsConfig.RootCAs = certpool
		}
		if cfg.CertFile != "" {
			if cfg.KeyFile == "" {
				return nil, nil, fmt.Errorf("missing key file")
			}
			pair, err := tls.LoadX509KeyPair(cfg.CertFile, cfg.KeyFile)
			if err != nil {
				return nil, nil, fmt.Errorf("cert/key: %v", err)
			}
			tlsConfig.Certificates = []tls.Certificate{pair}
		}
		if cfg.ServerName != "" {
			tlsConfig.ServerName = cfg.ServerName
		} else {
			addr, _, _ := net.SplitHostPort(cfg.ServerAddr)
			tlsConfig.ServerName = addr
		}
		cred := credentials.NewTLS(tlsConfig)
		opts = append(opts, grpc.WithTransportCredentials(cred))
	} else {
		opts = append(opts, grpc.WithInsecure())
	}
	if cfg.AuthToken != "" {
		cred := oauth.NewOauthAccess(&oauth2.Token{
			AccessToken: cfg.AuthToken,
			TokenType:   cfg.AuthTokenType,
		})
		opts = append(opts, grpc.WithPerRPCCredentials(cred))
	}
	if cfg.JWTKey != "" {
		cred, err := oauth.NewJWTAccessFromKey([]byte(cfg.JWTKey))
		if err != nil {
			return nil, nil, fmt.Errorf("jwt key: %v", err)
		}
		opts = append(opts, grpc.WithPerRPCCredentials(cred))
	}
	if cfg.JWTKeyFile != "" {
		cred, err := oauth.NewJWTAccessFromFile(cfg.JWTKeyFile)
		if err != nil {
			return nil, nil, fmt.Errorf("jwt key file: %v", err)
		}
		opts = append(opts, grpc.WithPerRPCCredentials(cred))
	}
	conn, err := grpc.Dial(cfg.ServerAddr, opts...)
	if err != nil {
		return nil, nil, err
	}
	return conn, New$NAMEClient(conn), nil
}

type _$NAMERoundTripFunc func(cli $NAMEClient, in iocodec.Decoder, out iocodec.Encoder) error

func _$NAMERoundTrip(sample interface{}, fn _$NAMERoundTripFunc) error {
	cfg := _Default$NAMEClientCommandConfig
	var em iocodec.EncoderMaker
	var ok bool
	if cfg.ResponseFormat == "" {
		em = iocodec.DefaultEncoders["json"]
	} else {
		em, ok = iocodec.DefaultEncoders[cfg.ResponseFormat]
		if !ok {
			return fmt.Errorf("invalid response format: %q", cfg.ResponseFormat)
		}
	}
	if cfg.PrintSampleRequest {
		return em.NewEncoder(os.Stdout).Encode(sample)
	}
	// read the input request, first from stdin, then from a file, otherwise from args only
	var d iocodec.Decoder
	if cfg.Stdin || cfg.RequestFile == "-" {
		d = iocodec.DefaultDecoders["json"].NewDecoder(os.Stdin)
	} else if cfg.RequestFile != "" {
		f, err := os.Open(cfg.RequestFile)
		if err != nil {
			return fmt.Errorf("request file: %v", err)
		}
		defer f.Close()
		ext := filepath.Ext(cfg.RequestFile)
		if len(ext) > 0 && ext[0] == '.' {
			ext = ext[1:]
		}
		dm, ok := iocodec.DefaultDecoders[ext]
		if !ok {
			return fmt.Errorf("invalid request file format: %q", ext)
		}
		d = dm.NewDecoder(f)
	} else {
		d = iocodec.DefaultDecoders["noop"].NewDecoder(os.Stdin)
	}
	conn, client, err := _Dial$NAME()
	if err != nil {
		return err
	}
	defer conn.Close()
	return fn(client, d, em.NewEncoder(os.Stdout))
}
"#;

/* Render a complete Go source file */
pub fn render_file(file: &GoFile) -> GenResult<String> {
  let mut out = String::new();

  writeln!(out, "// Code generated by protoc-gen-cobra. DO NOT EDIT.")?;
  writeln!(out, "// source: {}", file.source)?;
  writeln!(out)?;
  writeln!(out, "package {}", file.package)?;
  writeln!(out)?;
  render_imports(&mut out, &file.imports)?;
  writeln!(out)?;
  writeln!(out, "// This is a compile-time assertion to ensure that this generated file")?;
  writeln!(out, "// is compatible with the grpc package it is being compiled against.")?;
  writeln!(out, "const _ = grpc.SupportPackageIsVersion4")?;

  for unit in &file.units {
    writeln!(out)?;
    match unit {
      CommandUnit::ServiceGroup(group) => out.push_str(&render_service_group(group)),
      CommandUnit::Subcommand(subcommand) => render_subcommand(&mut out, subcommand)?,
      CommandUnit::SubcommandList {
        service,
        constructors,
      } => {
        writeln!(out, "var _{service}ClientSubCommands = []func() *cobra.Command{{")?;
        for constructor in constructors {
          writeln!(out, "\t{constructor},")?;
        }
        writeln!(out, "}}")?;
      }
    }
  }

  Ok(out)
}

/* Standard library imports first, then the rest, each group sorted by path */
fn render_imports(out: &mut String, imports: &[GoImport]) -> GenResult<()> {
  let (mut stdlib, mut external): (Vec<&GoImport>, Vec<&GoImport>) =
    imports.iter().partition(|import| import.is_std());
  stdlib.sort_by(|a, b| a.path.cmp(&b.path));
  external.sort_by(|a, b| a.path.cmp(&b.path));

  writeln!(out, "import (")?;
  for import in &stdlib {
    writeln!(out, "\t{} {}", import.alias, go_string(&import.path))?;
  }
  if !stdlib.is_empty() && !external.is_empty() {
    writeln!(out)?;
  }
  for import in &external {
    writeln!(out, "\t{} {}", import.alias, go_string(&import.path))?;
  }
  writeln!(out, ")")?;
  Ok(())
}

pub fn render_service_group(group: &ServiceGroup) -> String {
  substitute(
    SERVICE_GROUP_TEMPLATE,
    &[
      ("$SERVER_ADDR", go_string(&group.defaults.server_addr)),
      ("$RESPONSE_FORMAT", go_string(&group.defaults.response_format)),
      ("$TIMEOUT_SECS", group.defaults.timeout_secs.to_string()),
      ("$AUTH_TOKEN_TYPE", go_string(&group.defaults.auth_token_type)),
      ("$USE", go_string(&group.use_name)),
      ("$NAME", group.name.clone()),
    ],
  )
}

/* Single left-to-right pass, so substituted values are never rescanned */
fn substitute(template: &str, tokens: &[(&str, String)]) -> String {
  let mut out = String::with_capacity(template.len());
  let mut rest = template;
  while let Some(at) = rest.find('$') {
    out.push_str(&rest[..at]);
    rest = &rest[at..];
    match tokens.iter().find(|(token, _)| rest.starts_with(token)) {
      Some((token, value)) => {
        out.push_str(value);
        rest = &rest[token.len()..];
      }
      None => {
        out.push('$');
        rest = &rest[1..];
      }
    }
  }
  out.push_str(rest);
  out
}

pub fn render_subcommand(out: &mut String, subcommand: &Subcommand) -> GenResult<()> {
  let service = &subcommand.service;

  writeln!(out, "func {}() *cobra.Command {{", subcommand.constructor)?;
  write!(out, "\treqArgs := ")?;
  render_init(out, &subcommand.init, 1)?;
  writeln!(out)?;
  writeln!(out)?;
  writeln!(out, "\tcmd := &cobra.Command{{")?;
  writeln!(out, "\t\tUse:  {},", go_string(&subcommand.use_name))?;
  writeln!(out, "\t\tLong: {},", go_string(&subcommand.long))?;
  writeln!(out, "\t\tRun: func(cmd *cobra.Command, args []string) {{")?;
  writeln!(out, "\t\t\tvar v {}", subcommand.input_type)?;
  writeln!(
    out,
    "\t\t\terr := _{service}RoundTrip(v, func(cli {service}Client, in iocodec.Decoder, out iocodec.Encoder) error {{"
  )?;
  for step in &subcommand.steps {
    render_step(out, *step, &subcommand.method)?;
  }
  writeln!(out, "\t\t\t}})")?;
  writeln!(out, "\t\t\tif err != nil {{")?;
  writeln!(out, "\t\t\t\tlog.Fatal(err)")?;
  writeln!(out, "\t\t\t}}")?;
  writeln!(out, "\t\t}},")?;
  writeln!(out, "\t}}")?;

  if !subcommand.flags.is_empty() {
    writeln!(out)?;
  }
  for flag in &subcommand.flags {
    render_flag(out, flag)?;
  }

  writeln!(out)?;
  writeln!(out, "\treturn cmd")?;
  writeln!(out, "}}")?;
  Ok(())
}

pub fn render_flag(out: &mut String, flag: &FlagFragment) -> GenResult<()> {
  match flag {
    FlagFragment::Bind {
      binding,
      target,
      flag_name,
      help,
    } => writeln!(
      out,
      "\tcmd.PersistentFlags().{}(&{}, {}, {}, {})",
      binding.binder(),
      target,
      go_string(flag_name),
      binding.default_literal(),
      go_string(help)
    )?,
    FlagFragment::Unsupported { note } => {
      writeln!(out, "\tcmd.PersistentFlags() // Warning: {note}")?
    }
  }
  Ok(())
}

/* Multi-line composite literal; nested values are indented one tab deeper */
pub fn render_init(out: &mut String, expr: &InitExpr, indent: usize) -> GenResult<()> {
  match expr {
    InitExpr::Construct { type_name, fields } if fields.is_empty() => {
      write!(out, "&{type_name}{{}}")?
    }
    InitExpr::Construct { type_name, fields } => {
      writeln!(out, "&{type_name}{{")?;
      for (name, value) in fields {
        write!(out, "{}{name}: ", "\t".repeat(indent + 1))?;
        render_init(out, value, indent + 1)?;
        writeln!(out, ",")?;
      }
      write!(out, "{}}}", "\t".repeat(indent))?;
    }
    InitExpr::EmptyList { type_name } => write!(out, "[]*{type_name}{{}}")?,
    InitExpr::Empty => write!(out, "nil")?,
  }
  Ok(())
}

fn render_step(out: &mut String, step: DispatchStep, method: &str) -> GenResult<()> {
  const CHECK: &str = "\t\t\t\tif err != nil {\n\t\t\t\t\treturn err\n\t\t\t\t}\n";

  match step {
    DispatchStep::DecodeRequest => {
      writeln!(out, "\t\t\t\terr := in.Decode(&v)")?;
      out.push_str(CHECK);
    }
    DispatchStep::MergeFlags => writeln!(out, "\t\t\t\tproto.Merge(&v, reqArgs)")?,
    DispatchStep::CallUnary => {
      writeln!(out, "\t\t\t\tresp, err := cli.{method}(context.Background(), &v)")?;
      out.push_str(CHECK);
    }
    DispatchStep::OpenServerStream => {
      writeln!(out, "\t\t\t\tstream, err := cli.{method}(context.Background(), &v)")?;
      out.push_str(CHECK);
    }
    DispatchStep::OpenClientStream => {
      writeln!(out, "\t\t\t\tstream, err := cli.{method}(context.Background())")?;
      out.push_str(CHECK);
    }
    DispatchStep::SendUntilEof => out.push_str(concat!(
      "\t\t\t\tfor {\n",
      "\t\t\t\t\terr = in.Decode(&v)\n",
      "\t\t\t\t\tif err == io.EOF {\n",
      "\t\t\t\t\t\tstream.CloseSend()\n",
      "\t\t\t\t\t\tbreak\n",
      "\t\t\t\t\t}\n",
      "\t\t\t\t\tif err != nil {\n",
      "\t\t\t\t\t\treturn err\n",
      "\t\t\t\t\t}\n",
      "\t\t\t\t\tproto.Merge(&v, reqArgs)\n",
      "\t\t\t\t\terr = stream.Send(&v)\n",
      "\t\t\t\t\tif err != nil {\n",
      "\t\t\t\t\t\treturn err\n",
      "\t\t\t\t\t}\n",
      "\t\t\t\t}\n",
    )),
    DispatchStep::RecvUntilEof => out.push_str(concat!(
      "\t\t\t\tfor {\n",
      "\t\t\t\t\tresp, err := stream.Recv()\n",
      "\t\t\t\t\tif err == io.EOF {\n",
      "\t\t\t\t\t\tbreak\n",
      "\t\t\t\t\t}\n",
      "\t\t\t\t\tif err != nil {\n",
      "\t\t\t\t\t\treturn err\n",
      "\t\t\t\t\t}\n",
      "\t\t\t\t\terr = out.Encode(resp)\n",
      "\t\t\t\t\tif err != nil {\n",
      "\t\t\t\t\t\treturn err\n",
      "\t\t\t\t\t}\n",
      "\t\t\t\t}\n",
      "\t\t\t\treturn nil\n",
    )),
    DispatchStep::CloseAndRecv => {
      writeln!(out, "\t\t\t\tresp, err := stream.CloseAndRecv()")?;
      out.push_str(CHECK);
    }
    DispatchStep::EncodeResponse => writeln!(out, "\t\t\t\treturn out.Encode(resp)")?,
  }
  Ok(())
}

/* Interpreted Go string literal */
pub fn go_string(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + 2);
  out.push('"');
  for c in s.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c if c.is_control() => {
        let _ = write!(out, "\\u{:04x}", c as u32);
      }
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
