extern crate bio_types;
extern crate pamvar;

use bio_types::strand::Strand;

use pamvar::assemble::{Assembler, Assembly, Classified, Origin};
use pamvar::cas::CasProfile;
use pamvar::classify::Classifier;
use pamvar::guide::Span;
use pamvar::haplotype::Haplotype;
use pamvar::index::ChromosomeSites;
use pamvar::reference::Chromosome;
use pamvar::variant::{Genotype, Variant};

// SpCas9 PAM on the forward strand at 21-23
const FORWARD: &[u8] = b"TATTATATTTATAATATTATAGGTATATATATATATATATATATATAT";
// SpCas9 PAM on the reverse strand at 1-3
const REVERSE: &[u8] = b"CCTATTATATTTATAATATTATATATATATATATATATATATATATAT";
// SpCas9 PAM on the forward strand at 26-28; deleting the A at 26 moves it to 25
const MOVABLE: &[u8] = b"TTATATAATTTTATATAATTTATATAGGTATATATATATATATATATA";
// cpf1 PAM on the forward strand at 1-4
const CPF1_FORWARD: &[u8] = b"TTTACAGTCAGTCAGTCAGTCAGTCAGTCAGTCAGTCAGTCAGT";
// cpf1 PAM on the reverse strand at 21-24
const CPF1_REVERSE: &[u8] = b"CAGTCAGTCAGTCAGTCAGTGAAACTGACTGACTGACTGACTGA";
// No PAMs; a single G at 32
const NO_PAM: &[u8] = b"TTATATAATTTTATATAATTTTATATAATATGTTATAATTTTATATAATTTTATATAATT";

const REFERENCE_GUIDE: &[u8] = b"TATTATATTTATAATATTAT";

enum Policy {
    Personalized,
    AlleleSpecific,
}

fn variant(pos: u64, ref_allele: &str, alt_allele: &str, genotype: &str) -> Variant {
    let genotype = Genotype::parse(genotype).unwrap();

    Variant::new("chr1", pos, ref_allele, alt_allele).with_genotype(genotype)
}

fn assemble(
    sequence: &[u8],
    variants: &[Variant],
    policy: Policy,
    regions: Option<&[Span]>,
) -> Assembly {
    assemble_for("SpCas9", sequence, variants, policy, regions)
}

fn assemble_for(
    nuclease: &str,
    sequence: &[u8],
    variants: &[Variant],
    policy: Policy,
    regions: Option<&[Span]>,
) -> Assembly {
    let cas = CasProfile::lookup(nuclease).unwrap();
    let chromosome = Chromosome::new("chr1", sequence);
    let sites = ChromosomeSites::scan(&cas, "chr1", chromosome.sequence());
    let classifier = Classifier::new(&chromosome, &cas, &sites, 10);

    let haplotypes: Vec<Haplotype> = variants
        .iter()
        .map(|v| Haplotype::build(&chromosome, v, 40).unwrap())
        .collect();

    let classified: Vec<Classified> = variants
        .iter()
        .zip(haplotypes.iter())
        .map(|(variant, haplotype)| Classified {
            variant,
            haplotype,
            classification: classifier.classify(variant, haplotype).unwrap(),
        })
        .collect();

    let mut assembler = Assembler::new("chr1", &chromosome, &cas, &sites, false);
    if let Some(regions) = regions {
        assembler = assembler.with_regions(regions);
    }

    match policy {
        Policy::Personalized => assembler.personalized(&classified).unwrap(),
        Policy::AlleleSpecific => assembler.allele_specific(&classified).unwrap(),
    }
}

#[test]
fn test_unaffected_pam_gives_reference_guide() {
    let assembly = assemble(FORWARD, &[], Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::Reference);
    assert_eq!((candidate.start, candidate.stop), (0, 20));
    assert_eq!(candidate.ref_sequence, REFERENCE_GUIDE);
    assert_eq!(candidate.alt_sequence, REFERENCE_GUIDE);
    assert_eq!(candidate.ref_allele, None);
    assert_eq!(candidate.alt_allele, None);
    assert_eq!(candidate.variant_position, None);
    assert_eq!(candidate.variant_position_in_guide, None);
    assert_eq!(candidate.strand, Strand::Forward);
    assert_eq!(candidate.cas_type, "SpCas9");
    assert_eq!(candidate.pam_position, 21);
}

#[test]
fn test_heterozygous_variant_disqualifies_pam() {
    let variants = [variant(10, "T", "A", "0/1")];
    let assembly = assemble(FORWARD, &variants, Policy::Personalized, None);

    assert!(assembly.candidates.is_empty());
    assert_eq!(assembly.stats.disqualified, 1);
}

#[test]
fn test_variant_without_genotype_disqualifies_pam() {
    let variants = [Variant::new("chr1", 10, "T", "A")];
    let assembly = assemble(FORWARD, &variants, Policy::Personalized, None);

    assert!(assembly.candidates.is_empty());
}

#[test]
fn test_homozygous_variant_amends_guide() {
    let variants = [variant(10, "T", "A", "1/1")];
    let assembly = assemble(FORWARD, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::Amended);
    assert_eq!((candidate.start, candidate.stop), (0, 20));
    assert_eq!(candidate.ref_sequence, REFERENCE_GUIDE);
    assert_eq!(candidate.alt_sequence, b"TATTATATTAATAATATTAT");
    assert_eq!(candidate.ref_allele.as_deref(), Some("T"));
    assert_eq!(candidate.alt_allele.as_deref(), Some("A"));
    assert_eq!(candidate.variant_position, Some(10));
    assert_eq!(candidate.variant_position_in_guide, Some(10));
}

#[test]
fn test_homozygous_variant_amends_reverse_guide() {
    let variants = [variant(4, "A", "T", "1|1")];
    let assembly = assemble(REVERSE, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::Amended);
    assert_eq!(candidate.strand, Strand::Reverse);
    assert_eq!((candidate.start, candidate.stop), (3, 23));
    assert_eq!(candidate.ref_sequence, b"TATAATATTATAAATATAAT");
    assert_eq!(candidate.alt_sequence, b"TATAATATTATAAATATAAA");
    assert_eq!(candidate.variant_position_in_guide, Some(20));
    assert_eq!(candidate.pam_position, 3);
}

#[test]
fn test_multiple_homozygous_variants_are_skipped() {
    let variants = [variant(5, "A", "T", "1/1"), variant(10, "T", "A", "1/1")];
    let assembly = assemble(FORWARD, &variants, Policy::Personalized, None);

    assert!(assembly.candidates.is_empty());
    assert_eq!(assembly.stats.multi_variant, 1);
}

#[test]
fn test_variant_outside_guide_keeps_reference_guide() {
    let variants = [variant(40, "T", "A", "0/1")];
    let assembly = assemble(FORWARD, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);
    assert_eq!(assembly.candidates[0].origin, Origin::Reference);
}

#[test]
fn test_heterozygous_destroyed_pam() {
    let variants = [variant(22, "G", "T", "0/1")];
    let assembly = assemble(FORWARD, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::DestroyedPam);
    assert_eq!(candidate.ref_sequence, REFERENCE_GUIDE);
    assert_eq!(candidate.alt_sequence, vec![b'G'; 20]);
    assert_eq!(candidate.variant_position_in_guide, Some(22));
    assert_eq!(assembly.stats.disqualified, 1);
}

#[test]
fn test_homozygous_destroyed_pam() {
    let variants = [variant(22, "G", "T", "1/1")];
    let assembly = assemble(FORWARD, &variants, Policy::Personalized, None);

    assert!(assembly.candidates.is_empty());
    assert_eq!(assembly.stats.disqualified, 1);
}

#[test]
fn test_created_pam() {
    // ATGT -> ATGG
    let variants = [variant(33, "T", "G", "1/1")];
    let assembly = assemble(NO_PAM, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::CreatedPam);
    assert_eq!((candidate.start, candidate.stop), (10, 30));
    assert_eq!(candidate.ref_sequence, vec![b'G'; 20]);
    assert_eq!(candidate.alt_sequence, b"TTATATAATTTTATATAATA");
    assert_eq!(candidate.variant_position_in_guide, Some(23));
    assert_eq!(candidate.pam_position, 31);
}

#[test]
fn test_guides_have_guide_length() {
    let variants = [variant(10, "T", "A", "1/1"), variant(33, "T", "G", "0/1")];

    for sequence in &[FORWARD, REVERSE, NO_PAM] {
        let assembly = assemble(sequence, &variants, Policy::Personalized, None);

        for candidate in &assembly.candidates {
            assert_eq!(candidate.stop - candidate.start, 20);
            assert_eq!(candidate.ref_sequence.len(), 20);
            assert_eq!(candidate.alt_sequence.len(), 20);
        }
    }
}

#[test]
fn test_allele_specific_near_pam() {
    let variants = [variant(10, "T", "A", "0/1")];
    let assembly = assemble(FORWARD, &variants, Policy::AlleleSpecific, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::NearPam);
    assert_eq!(candidate.ref_sequence, REFERENCE_GUIDE);
    assert_eq!(candidate.alt_sequence, b"TATTATATTAATAATATTAT");
    assert_eq!(candidate.variant_position_in_guide, Some(10));
}

#[test]
fn test_allele_specific_ignores_homozygous_variants() {
    let variants = [variant(10, "T", "A", "1/1")];
    let assembly = assemble(FORWARD, &variants, Policy::AlleleSpecific, None);

    assert!(assembly.candidates.is_empty());
}

#[test]
fn test_allele_specific_destroyed_pam() {
    let variants = [variant(22, "G", "T", "0/1")];
    let assembly = assemble(FORWARD, &variants, Policy::AlleleSpecific, None);

    assert_eq!(assembly.candidates.len(), 1);
    assert_eq!(assembly.candidates[0].origin, Origin::DestroyedPam);
}

#[test]
fn test_regions_restrict_guides() {
    let outside = [Span::new(31, 40)];
    let assembly = assemble(FORWARD, &[], Policy::Personalized, Some(&outside));

    assert!(assembly.candidates.is_empty());

    let inside = [Span::new(21, 21)];
    let assembly = assemble(FORWARD, &[], Policy::Personalized, Some(&inside));

    assert_eq!(assembly.candidates.len(), 1);
}

#[test]
fn test_homozygous_deletion_moves_pam() {
    let variants = [variant(25, "TA", "T", "1/1")];
    let assembly = assemble(MOVABLE, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);
    assert_eq!(assembly.stats.disqualified, 1);
    assert_eq!(assembly.stats.created, 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::CreatedPam);
    assert_eq!((candidate.start, candidate.stop), (4, 24));
    assert_eq!(candidate.ref_sequence, vec![b'G'; 20]);
    assert_eq!(candidate.alt_sequence, b"ATAATTTTATATAATTTATA");
    assert_eq!(candidate.variant_position_in_guide, Some(21));
    assert_eq!(candidate.pam_position, 25);
}

#[test]
fn test_heterozygous_deletion_moves_pam() {
    let variants = [variant(25, "TA", "T", "0/1")];
    let assembly = assemble(MOVABLE, &variants, Policy::Personalized, None);

    let origins: Vec<Origin> = assembly.candidates.iter().map(|c| c.origin).collect();
    assert_eq!(origins, vec![Origin::CreatedPam, Origin::DestroyedPam]);

    let destroyed = &assembly.candidates[1];
    assert_eq!((destroyed.start, destroyed.stop), (5, 25));
    assert_eq!(destroyed.ref_sequence, b"TAATTTTATATAATTTATAT");
    assert_eq!(destroyed.alt_sequence, vec![b'G'; 20]);
    assert_eq!(destroyed.variant_position_in_guide, Some(20));
    assert_eq!(destroyed.pam_position, 26);
}

#[test]
fn test_cpf1_reference_guides() {
    let assembly = assemble_for("cpf1", CPF1_FORWARD, &[], Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::Reference);
    assert_eq!(candidate.cas_type, "cpf1");
    assert_eq!((candidate.start, candidate.stop), (4, 24));
    assert_eq!(candidate.ref_sequence, b"CAGTCAGTCAGTCAGTCAGT");
    assert_eq!(candidate.pam_position, 4);
}

#[test]
fn test_cpf1_homozygous_variant_amends_guide() {
    let variants = [variant(6, "A", "C", "1/1")];
    let assembly = assemble_for("cpf1", CPF1_FORWARD, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::Amended);
    assert_eq!(candidate.strand, Strand::Forward);
    assert_eq!((candidate.start, candidate.stop), (4, 24));
    assert_eq!(candidate.ref_sequence, b"CAGTCAGTCAGTCAGTCAGT");
    assert_eq!(candidate.alt_sequence, b"CCGTCAGTCAGTCAGTCAGT");
    assert_eq!(candidate.variant_position_in_guide, Some(6));
    assert_eq!(candidate.pam_position, 4);
}

#[test]
fn test_cpf1_homozygous_variant_amends_reverse_guide() {
    let variants = [variant(15, "G", "C", "1/1")];
    let assembly = assemble_for("cpf1", CPF1_REVERSE, &variants, Policy::Personalized, None);

    assert_eq!(assembly.candidates.len(), 1);

    let candidate = &assembly.candidates[0];
    assert_eq!(candidate.origin, Origin::Amended);
    assert_eq!(candidate.strand, Strand::Reverse);
    assert_eq!((candidate.start, candidate.stop), (0, 20));
    assert_eq!(candidate.ref_sequence, b"ACTGACTGACTGACTGACTG");
    assert_eq!(candidate.alt_sequence, b"ACTGAGTGACTGACTGACTG");
    assert_eq!(candidate.variant_position_in_guide, Some(10));
    assert_eq!(candidate.pam_position, 21);
}

#[test]
fn test_cpf1_heterozygous_variant_disqualifies_pam() {
    let variants = [variant(6, "A", "C", "0/1")];
    let assembly = assemble_for("cpf1", CPF1_FORWARD, &variants, Policy::Personalized, None);

    assert!(assembly.candidates.is_empty());
    assert_eq!(assembly.stats.disqualified, 1);
}
