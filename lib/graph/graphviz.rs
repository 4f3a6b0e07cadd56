//! Rendering of diagrams in the [DOT language][dot-lang].
//!
//! [dot-lang]: https://en.wikipedia.org/wiki/DOT_(graph_description_language)

use std::{ fs, io::Write, path::Path };
use rustc_hash::FxHashSet;
use crate::graph::{
    Generator,
    QuantumType,
    VertId,
    ZXDiagram,
    ZXError,
    ZXResult,
    ZXType,
    ZXWireType,
};

impl Generator {
    pub(crate) fn graph_attrs(&self) -> tabbycat::AttrList {
        use tabbycat::*;
        use tabbycat::attributes::*;
        use crate::vizdefs::*;
        let param_label =
            || self.param().map(|p| format!("{}", p)).unwrap_or_default();
        let attrs =
            match self.ty() {
                ZXType::ZSpider | ZXType::XSpider => {
                    let fill =
                        if self.ty() == ZXType::ZSpider {
                            Z_COLOR
                        } else {
                            X_COLOR
                        };
                    let ph =
                        self.param().filter(|p| p.clifford_multiple() != Some(0));
                    AttrList::new()
                        .add_pair(label(
                            ph.map(|p| format!("{}", p)).unwrap_or_default()))
                        .add_pair(shape(Shape::Circle))
                        .add_pair(height(CIRCLE_HEIGHT))
                        .add_pair(style(Style::Filled))
                        .add_pair(fillcolor(fill))
                },
                ZXType::Hbox => {
                    AttrList::new()
                        .add_pair(label(param_label()))
                        .add_pair(shape(Shape::Square))
                        .add_pair(height(SQUARE_HEIGHT))
                        .add_pair(style(Style::Filled))
                        .add_pair(fillcolor(H_COLOR))
                },
                ty if ty.is_mbqc() => {
                    AttrList::new()
                        .add_pair(label(self.name()))
                        .add_pair(shape(Shape::Circle))
                        .add_pair(height(CIRCLE_HEIGHT))
                        .add_pair(style(Style::Filled))
                        .add_pair(fillcolor(MBQC_COLOR))
                },
                ty if ty.is_boundary() => {
                    AttrList::new()
                        .add_pair(label(self.name()))
                        .add_pair(shape(Shape::Plaintext))
                },
                _ => {
                    AttrList::new()
                        .add_pair(label(self.name()))
                        .add_pair(shape(Shape::Rectangle))
                        .add_pair(style(Style::Filled))
                        .add_pair(fillcolor(BOX_COLOR))
                },
            };
        if self.qtype() == Some(QuantumType::Classical) && !self.ty().is_boundary() {
            attrs.add_pair(xlabel("C"))
        } else {
            attrs
        }
    }
}

impl ZXDiagram {
    /// Return an object containing an encoding of `self` in the [DOT
    /// language][dot-lang].
    ///
    /// Vertices in `highlight` are outlined in a contrasting color. Inputs and
    /// outputs are kept in ordered columns at either side of the rendering,
    /// and the global scalar is shown beneath the inputs. Hadamard wires are
    /// dashed and `Classical` wires are gray. Wires at the ports of directed
    /// generators are labeled with their port index.
    ///
    /// Rendering this object using the default formatter will result in a full
    /// DOT string representation of the diagram.
    ///
    /// [dot-lang]: https://en.wikipedia.org/wiki/DOT_(graph_description_language)
    pub fn to_graphviz(&self, highlight: &FxHashSet<VertId>)
        -> ZXResult<tabbycat::Graph>
    {
        use tabbycat::*;
        use tabbycat::attributes::*;
        use crate::vizdefs::*;
        // initial declarations
        let mut statements =
            StmtList::new()
            .add_attr(
                AttrType::Graph,
                AttrList::new().add_pair(rankdir(RankDir::LR)),
            )
            .add_attr(
                AttrType::Node,
                AttrList::new()
                    .add_pair(fontname(FONT))
                    .add_pair(fontsize(FONTSIZE))
                    .add_pair(margin(NODE_MARGIN)),
            );

        let node_attrs = |v: VertId, gen: &Generator| {
            let attrs = gen.graph_attrs();
            if highlight.contains(&v) {
                attrs.add_pair(color(HIGHLIGHT))
            } else {
                attrs
            }
        };

        // place a column of boundaries in a cluster at the same rank, chained
        // top to bottom by invisible edges
        let column =
            |ty: ZXType, rank_type: RankType, scalar: Option<usize>|
                -> ZXResult<StmtList>
            {
                let mut stmts =
                    StmtList::new()
                    .add_attr(
                        AttrType::Graph,
                        AttrList::new().add_pair(rank(rank_type)),
                    );
                let mut ids: Vec<usize> = Vec::new();
                for (k, b) in self.boundary(Some(ty), None).into_iter().enumerate() {
                    let gen = self.generator(b)?;
                    let mut attrs =
                        AttrList::new()
                        .add_pair(label(format!("{} {}", gen.name(), k)))
                        .add_pair(shape(Shape::Plaintext));
                    if highlight.contains(&b) {
                        attrs = attrs.add_pair(color(HIGHLIGHT));
                    }
                    stmts = stmts.add_node(b.index().into(), None, Some(attrs));
                    ids.push(b.index());
                }
                if let Some(scalar_id) = scalar {
                    let attrs =
                        AttrList::new()
                        .add_pair(label(format!("{}", self.scalar)))
                        .add_pair(shape(Shape::Rectangle))
                        .add_pair(style(Style::Filled))
                        .add_pair(fillcolor(H_COLOR));
                    stmts = stmts.add_node(scalar_id.into(), None, Some(attrs));
                    ids.push(scalar_id);
                }
                for (prev, next) in ids.iter().zip(ids.iter().skip(1)) {
                    stmts =
                        stmts.add_edge(
                            Edge::head_node(
                                (*prev).into(),
                                Some(Port::compass(Compass::South)),
                            )
                            .line_to_node(
                                (*next).into(),
                                Some(Port::compass(Compass::North)),
                            )
                            .add_attrpair(style(Style::Invisible))
                        );
                }
                Ok(stmts)
            };

        let scalar_id =
            self.vertices().map(|(v, _)| v.index() + 1).max().unwrap_or(0);
        statements =
            statements.add_subgraph(SubGraph::cluster(
                column(ZXType::Input, RankType::Source, Some(scalar_id))?));
        statements =
            statements.add_subgraph(SubGraph::cluster(
                column(ZXType::Output, RankType::Sink, None)?));

        // interior nodes and open boundaries
        for (v, gen) in self.vertices() {
            if matches!(gen.ty(), ZXType::Input | ZXType::Output) { continue; }
            statements =
                statements.add_node(v.index().into(), None, Some(node_attrs(v, gen)));
        }

        // add wires
        for (_, s, t, props) in self.wires() {
            let mut edge =
                Edge::head_node(s.index().into(), None)
                .line_to_node(t.index().into(), None);
            if props.wire_type == ZXWireType::H {
                edge =
                    edge.add_attrpair(style(Style::Dashed))
                    .add_attrpair(color(H_WIRE));
            } else if props.qtype == QuantumType::Classical {
                edge = edge.add_attrpair(color(C_WIRE));
            }
            let ports =
                match (props.source_port, props.target_port) {
                    (None, None) => None,
                    (Some(p), None) => Some(format!("{}:", p)),
                    (None, Some(q)) => Some(format!(":{}", q)),
                    (Some(p), Some(q)) => Some(format!("{}:{}", p, q)),
                };
            if let Some(port_label) = ports {
                edge = edge.add_attrpair(label(port_label));
            }
            statements = statements.add_edge(edge);
        }

        GraphBuilder::default()
            .graph_type(GraphType::Graph)
            .strict(false)
            .id(Identity::quoted(""))
            .stmts(statements)
            .build()
            .map_err(|e| ZXError::GraphvizError(e.to_string()))
    }

    /// Like [`to_graphviz`][Self::to_graphviz], but render directly to a
    /// string.
    pub fn to_graphviz_str(&self, highlight: &FxHashSet<VertId>)
        -> ZXResult<String>
    {
        self.to_graphviz(highlight).map(|graphviz| format!("{}", graphviz))
    }

    /// Like [`to_graphviz`][Self::to_graphviz], but render directly to a string
    /// and write it to `path`.
    pub fn save_graphviz<P>(&self, highlight: &FxHashSet<VertId>, path: P)
        -> ZXResult<()>
    where P: AsRef<Path>
    {
        let graphviz = self.to_graphviz(highlight)?;
        fs::OpenOptions::new()
            .write(true)
            .append(false)
            .create(true)
            .truncate(true)
            .open(path)?
            .write_all(format!("{}", graphviz).as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_traits::Zero;
    use crate::expr::Expr;
    use QuantumType::*;

    #[test]
    fn render() -> anyhow::Result<()> {
        let mut dg = ZXDiagram::with_boundary(1, 1, 0, 0);
        let (i, o) = (dg.boundary[0], dg.boundary[1]);
        let z = dg.add_vertex(Generator::z_spider(Expr::ratio(1, 2), Quantum));
        let x = dg.add_vertex(Generator::x_spider(Expr::zero(), Quantum));
        dg.add_wire(i, z, ZXWireType::Basic, Quantum)?;
        dg.add_wire(z, x, ZXWireType::H, Quantum)?;
        dg.add_wire(x, o, ZXWireType::Basic, Quantum)?;
        let highlight: FxHashSet<VertId> = [z].into_iter().collect();
        let a = dg.to_graphviz_str(&highlight)?;
        let b = dg.to_graphviz_str(&highlight)?;
        assert_eq!(a, b);
        assert!(a.contains("1/2"));
        assert!(a.contains("Q-Input 0"));
        assert!(a.contains("Q-Output 0"));
        Ok(())
    }
}
