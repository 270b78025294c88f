/// Embedded web assets for the graph view

pub const D3_URL: &str = "https://d3js.org/d3.v7.min.js";

pub const STYLE: &str = r#"
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
        }

        #graph-app {
            position: fixed;
            top: 0;
            left: 0;
            right: 0;
            bottom: 0;
            background: #f6f8fa;
            z-index: 9999;
            overflow: hidden;
        }

        #graph-header {
            padding: 15px;
            background: #24292e;
            color: white;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }

        #graph-title {
            margin: 0;
            font-size: 18px;
        }

        #graph-close {
            background: none;
            border: none;
            color: white;
            font-size: 16px;
            cursor: pointer;
        }

        #graph-container {
            width: 100%;
            height: calc(100% - 50px);
        }

        .loading {
            position: absolute;
            top: 50%;
            left: 50%;
            transform: translate(-50%, -50%);
            font-size: 16px;
        }

        .node circle {
            cursor: pointer;
        }

        .node-text {
            font-size: 12px;
            pointer-events: none;
        }

        .activity .node-text {
            fill: #fff;
            font-weight: bold;
            text-shadow: 1px 1px 2px #000;
        }
"#;

pub const SCRIPT: &str = r#"
        const config = JSON.parse(document.getElementById('linkrepo-config').textContent);
        const container = document.getElementById('graph-container');
        const loading = container.querySelector('.loading');

        document.getElementById('graph-close').addEventListener('click', () => {
            window.location.href = config.closeHref;
        });

        function setStatus(text) {
            if (loading) loading.textContent = text;
        }

        function nodeColor(d) {
            if (d.type === 'user') return '#28a745';
            if (d.type === 'org') return '#6f42c1';
            return d.fork ? '#6a737d' : '#0366d6';
        }

        function renderGraph(graphData) {
            container.innerHTML = '';
            const weighted = graphData.metadata.source === 'activity';
            if (weighted) container.classList.add('activity');

            const width = container.clientWidth;
            const height = container.clientHeight;

            const svg = d3.select(container)
                .append('svg')
                .attr('width', width)
                .attr('height', height);

            const g = svg.append('g');

            svg.call(d3.zoom()
                .scaleExtent([0.1, 8])
                .on('zoom', (event) => {
                    g.attr('transform', event.transform);
                }));

            const simulation = d3.forceSimulation(graphData.nodes)
                .force('link', d3.forceLink(graphData.links).id(d => d.id).distance(d => {
                    if (weighted && d.source.type === 'user') return 200;
                    return 150;
                }))
                .force('charge', d3.forceManyBody().strength(weighted ? -500 : -400))
                .force('center', d3.forceCenter(width / 2, height / 2))
                .force('collision', d3.forceCollide().radius(d => d.size + (weighted ? 5 : 10)));

            const link = g.append('g')
                .attr('class', 'links')
                .selectAll('line')
                .data(graphData.links)
                .enter().append('line')
                .attr('stroke', d => d.source.type === 'user' ? '#6a737d' : '#586069')
                .attr('stroke-width', d => weighted ? d.value : (d.value === 1 ? 1.5 : 2))
                .attr('stroke-opacity', 0.8);

            const node = g.append('g')
                .attr('class', 'nodes')
                .selectAll('g')
                .data(graphData.nodes)
                .enter().append('g')
                .attr('class', 'node')
                .call(d3.drag()
                    .on('start', dragstarted)
                    .on('drag', dragged)
                    .on('end', dragended));

            node.append('circle')
                .attr('r', d => d.size)
                .attr('fill', nodeColor)
                .attr('stroke', '#fff')
                .attr('stroke-width', 2)
                .on('click', (event, d) => {
                    if (d.url) window.open(d.url, '_blank');
                });

            node.append('text')
                .attr('class', 'node-text')
                .text(d => d.name)
                .attr('x', d => d.size + 5)
                .attr('y', 4);

            node.append('title')
                .text(d => d.tooltip || '');

            simulation.on('tick', () => {
                link
                    .attr('x1', d => d.source.x)
                    .attr('y1', d => d.source.y)
                    .attr('x2', d => d.target.x)
                    .attr('y2', d => d.target.y);

                node.attr('transform', d => `translate(${d.x},${d.y})`);
            });

            function dragstarted(event) {
                if (!event.active) simulation.alphaTarget(0.3).restart();
                event.subject.fx = event.subject.x;
                event.subject.fy = event.subject.y;
            }

            function dragged(event) {
                event.subject.fx = event.x;
                event.subject.fy = event.y;
            }

            function dragended(event) {
                if (!event.active) simulation.alphaTarget(0);
                event.subject.fx = null;
                event.subject.fy = null;
            }
        }

        let done = false;

        async function pollStatus() {
            try {
                const response = await fetch(config.statusUrl);
                if (response.ok && !done) setStatus((await response.json()).status);
            } catch (_) {}
        }

        async function load() {
            if (config.data) {
                renderGraph(config.data);
                return;
            }

            const timer = setInterval(pollStatus, 500);
            try {
                const response = await fetch(config.graphUrl);
                const body = await response.json();
                if (!response.ok) throw new Error(body.error || `HTTP ${response.status}`);
                renderGraph(body);
            } catch (error) {
                setStatus(`Error: ${error.message}`);
            } finally {
                done = true;
                clearInterval(timer);
            }
        }

        load();
"#;
