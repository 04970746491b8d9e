// error_chain generates code using the deprecated Error::description
#![allow(deprecated)]

error_chain! {
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        UnknownNuclease(name: String) {
            description("unknown nuclease")
            display("unknown nuclease {:?}", name)
        }

        UnknownChromosome(name: String) {
            description("unknown chromosome")
            display("chromosome {:?} not found in reference", name)
        }

        OutOfBounds(chrom: String, start: u64, stop: u64, len: u64) {
            description("sequence read out of bounds")
            display("read of {}:{}-{} outside of chromosome of length {}", chrom, start, stop, len)
        }

        UnsupportedMultiVariantWindow(chrom: String, anchor: u64, count: usize) {
            description("multiple homozygous variants in guide")
            display("{} homozygous variants in guide for PAM at {}:{}; amending more than one \
                     variant is not supported", count, chrom, anchor)
        }

        InvalidVariant(line: usize, reason: String) {
            description("invalid variant record")
            display("invalid variant on line {}: {}", line, reason)
        }

        InvalidIndex(reason: String) {
            description("invalid PAM index")
            display("invalid PAM index: {}", reason)
        }
    }
}
