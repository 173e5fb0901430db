error_chain! {
    links {
        Cover(::gocover::Error, ::gocover::ErrorKind);
    }

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        InvalidColorChoice(value: String) {
            description("invalid --color value")
            display("invalid --color value `{}`, expected one of `auto`, `always`, `never`", value)
        }
    }
}
